//! Profile command implementation

use std::path::Path;

use anyhow::{Context, Result};

use sprout_core::catalog;

pub fn cmd_profile(data_dir: &Path) -> Result<()> {
    let profile = catalog::load_seed_profile(data_dir).context("Failed to load seed profile")?;

    println!("🌱 Sprout profile");
    println!("   Wallet balance:       {}", profile.wallet_balance);
    println!("   Total impact:         {}", profile.total_impact);
    println!("   Active habits:        {}", profile.active_habits.len());
    println!("   Answers recorded:     {}", profile.answers.len());
    println!(
        "   Challenges completed: {}",
        profile.stats.total_challenges_completed
    );
    println!("   Longest streak:       {}", profile.stats.longest_streak);
    println!("   Badges:               {}", profile.stats.badges.len());
    println!("   Ledger entries:       {}", profile.transactions.len());

    Ok(())
}
