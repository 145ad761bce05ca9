use ledger_core::LedgerError;
use ledger_state::StateDb;

use crate::types::TaxView;

/// `get_latest_tax`.
pub fn get_latest_tax(db: &StateDb) -> Result<TaxView, LedgerError> {
    let record = db.get_tax()?.ok_or(LedgerError::NoTaxes)?;
    Ok(TaxView {
        percentage: record.percentage,
        inflator: record.inflator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{PubKeyHex, TaxRecord};

    #[test]
    fn no_taxes_before_any_is_set() {
        let db = StateDb::open_temporary().unwrap();
        assert!(matches!(get_latest_tax(&db).unwrap_err(), LedgerError::NoTaxes));
    }

    #[test]
    fn latest_tax_reflects_last_write() {
        let db = StateDb::open_temporary().unwrap();
        db.set_tax(&TaxRecord {
            percentage: 23,
            inflator: PubKeyHex("pi".into()),
        })
        .unwrap();
        let view = get_latest_tax(&db).unwrap();
        assert_eq!(view.percentage, 23);
    }
}
