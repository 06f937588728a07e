use crate::{
    data::{ContributionRow, Report, SchemaError, SummaryRow, EXPENSE_COLUMN, INCOME_COLUMN},
    read::SummaryUser,
};
use rust_decimal::{prelude::ToPrimitive, Decimal};

/// Running sums of the summary table. Sums are kept exact: the conversion to
/// whole numbers only happens once, on the final figures.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Totals {
    pub inflows: Decimal,
    pub outflows: Decimal,
}

impl SummaryUser for Totals {
    fn use_row(&mut self, row: SummaryRow) -> Result<(), SchemaError> {
        self.inflows = self
            .inflows
            .checked_add(row.income)
            .ok_or_else(|| SchemaError::Overflow(INCOME_COLUMN.to_string()))?;
        self.outflows = self
            .outflows
            .checked_add(row.expense)
            .ok_or_else(|| SchemaError::Overflow(EXPENSE_COLUMN.to_string()))?;
        Ok(())
    }
}

/// Drops the fractional part of a sum. This truncates toward zero, it does
/// *not* round: 1234.99 gives 1234 and -0.5 gives 0.
// FIXME: truncating currency sums loses up to one unit per figure; keep it
// until whoever consumes the dashboard says rounding is wanted.
fn whole(sum: Decimal, column: &str) -> Result<i64, SchemaError> {
    sum.trunc()
        .to_i64()
        .ok_or_else(|| SchemaError::Overflow(column.to_string()))
}

impl Report {
    /// Assembles the report. The balance is derived from the already truncated
    /// figures, so `total_balance == inflows - outflows` holds exactly.
    pub fn new(
        totals: Totals,
        member_contributions: Vec<ContributionRow>,
    ) -> Result<Self, SchemaError> {
        let inflows = whole(totals.inflows, INCOME_COLUMN)?;
        let outflows = whole(totals.outflows, EXPENSE_COLUMN)?;
        if inflows.checked_sub(outflows).is_none() {
            return Err(SchemaError::Overflow("total_balance".to_string()));
        }
        Ok(Self {
            inflows,
            outflows,
            member_contributions,
        })
    }
}
