//! Reset command: delete everything.

use std::io::Write;

use anyhow::{Context, Result};
use sip_db::Database;

/// Clears all data when `confirmed`.
pub fn run<W: Write>(writer: &mut W, db: &mut Database, confirmed: bool) -> Result<()> {
    if !confirmed {
        anyhow::bail!("refusing to delete all data without --yes");
    }
    db.clear_all().context("failed to clear data")?;
    writeln!(writer, "All intakes and settings deleted.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, NaiveDate, Utc};
    use sip_core::{DrinkKind, IntakeEvent, IntakeId, IntakeStore};

    #[test]
    fn test_reset_requires_confirmation() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&IntakeEvent::new(
            IntakeId::new("a").unwrap(),
            DateTime::<Utc>::UNIX_EPOCH,
            500,
            DrinkKind::water(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ))
        .unwrap();

        assert!(run(&mut Vec::new(), &mut db, false).is_err());
        assert_eq!(db.all().unwrap().len(), 1);

        run(&mut Vec::new(), &mut db, true).unwrap();
        assert!(db.all().unwrap().is_empty());
    }
}
