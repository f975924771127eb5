//! Status command implementation

use std::path::Path;

use anyhow::Result;
use subtrack_core::db::DB_KEY_ENV;

use super::open_db;

/// Human-readable file size
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["B", "KB", "MB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    let key_set = std::env::var(DB_KEY_ENV).is_ok();

    println!();
    println!("📊 SubTrack Status");
    println!("   ─────────────────────────────────────────────");
    println!("   Database:    {}", db_path.display());

    let Ok(metadata) = std::fs::metadata(db_path) else {
        println!("   ⚠️  Not initialized (run `subtrack init`)");
        println!();
        return Ok(());
    };
    println!("   Size:        {}", format_size(metadata.len()));

    let encryption = match (no_encrypt, key_set) {
        (true, _) => "⚠️  off (--no-encrypt)".to_string(),
        (false, true) => format!("🔒 on ({} set)", DB_KEY_ENV),
        (false, false) => format!("❌ {} not set", DB_KEY_ENV),
    };
    println!("   Encryption:  {}", encryption);

    let stats = match open_db(db_path, no_encrypt).and_then(|db| Ok(db.subscription_stats()?)) {
        Ok(stats) => stats,
        Err(e) => {
            println!();
            println!("   ❌ Cannot read database: {:#}", e);
            println!();
            return Ok(());
        }
    };

    println!();
    println!(
        "   Subscriptions: {} ({} ongoing, {} ended)",
        stats.total,
        stats.ongoing,
        stats.ended()
    );
    println!("   Users:         {}", stats.users);
    match stats.earliest_start {
        Some(month) => println!("   Since:         {}", month),
        None => println!("   Since:         (nothing tracked yet)"),
    }
    println!();

    Ok(())
}
