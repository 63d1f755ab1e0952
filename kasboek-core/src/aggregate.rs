//! Income/expense aggregation per counterparty.

use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::TransactionRecord;

/// Where a group whose amounts sum to exactly zero ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroSumPolicy {
    /// Left out of both tables.
    #[default]
    Exclude,
    /// Counted as income.
    Income,
}

/// Summed amount for one (name, IBAN) group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTotal {
    pub name: String,
    pub iban: String,
    pub amount: Decimal,
}

/// One side of the aggregate table; `Padding` keeps both sides equally long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateEntry {
    Group(GroupTotal),
    Padding,
}

impl AggregateEntry {
    pub fn group(&self) -> Option<&GroupTotal> {
        match self {
            AggregateEntry::Group(g) => Some(g),
            AggregateEntry::Padding => None,
        }
    }
}

/// Side-by-side row as exported; `None` cells are written empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRow {
    pub income_name: Option<String>,
    pub income_amount: Option<Decimal>,
    pub expense_name: Option<String>,
    pub expense_amount: Option<Decimal>,
}

impl AggregateRow {
    pub const HEADERS: [&'static str; 4] =
        ["Income Names", "Income Amount", "Expense Names", "Expense Amount"];
}

/// Parallel income and expense tables of equal length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IncomeExpenses {
    pub income: Vec<AggregateEntry>,
    pub expense: Vec<AggregateEntry>,
}

impl IncomeExpenses {
    pub fn income_groups(&self) -> impl Iterator<Item = &GroupTotal> {
        self.income.iter().filter_map(AggregateEntry::group)
    }

    pub fn expense_groups(&self) -> impl Iterator<Item = &GroupTotal> {
        self.expense.iter().filter_map(AggregateEntry::group)
    }

    /// Number of rows in the side-by-side table.
    pub fn len(&self) -> usize {
        self.income.len()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty()
    }

    pub fn rows(&self) -> Vec<AggregateRow> {
        self.income
            .iter()
            .zip(&self.expense)
            .map(|(inc, exp)| {
                let inc = inc.group();
                let exp = exp.group();
                AggregateRow {
                    income_name: inc.map(|g| g.name.clone()),
                    income_amount: inc.map(|g| g.amount),
                    expense_name: exp.map(|g| g.name.clone()),
                    expense_amount: exp.map(|g| g.amount),
                }
            })
            .collect()
    }
}

/// Group transactions by (name, IBAN), sum them, and split into income and
/// expense tables padded to the same length.
///
/// Groups appear in ascending (name, IBAN) order.
pub fn aggregate(transactions: &[TransactionRecord], policy: ZeroSumPolicy) -> IncomeExpenses {
    let mut totals: BTreeMap<(&str, &str), Decimal> = BTreeMap::new();
    for txn in transactions {
        *totals
            .entry((txn.name.as_str(), txn.iban.as_str()))
            .or_default() += txn.amount;
    }

    let mut out = IncomeExpenses::default();
    for ((name, iban), amount) in totals {
        let entry = AggregateEntry::Group(GroupTotal {
            name: name.to_string(),
            iban: iban.to_string(),
            amount,
        });

        if amount > Decimal::ZERO || (amount.is_zero() && policy == ZeroSumPolicy::Income) {
            out.income.push(entry);
        } else if amount < Decimal::ZERO {
            out.expense.push(entry);
        }
    }

    debug!(
        "aggregate: {} transactions -> {} income, {} expense groups",
        transactions.len(),
        out.income.len(),
        out.expense.len()
    );

    let rows = out.income.len().max(out.expense.len());
    out.income.resize(rows, AggregateEntry::Padding);
    out.expense.resize(rows, AggregateEntry::Padding);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn txn(name: &str, iban: &str, amount: i64) -> TransactionRecord {
        TransactionRecord {
            date: "01-01-2024".to_string(),
            iban: iban.to_string(),
            name: name.to_string(),
            amount: Decimal::from(amount),
            description: String::new(),
        }
    }

    #[test]
    fn test_sums_group_into_income() {
        let txns = vec![txn("Alice", "NL01X", 100), txn("Alice", "NL01X", -20)];
        let agg = aggregate(&txns, ZeroSumPolicy::Exclude);

        let income: Vec<_> = agg.income_groups().collect();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].name, "Alice");
        assert_eq!(income[0].iban, "NL01X");
        assert_eq!(income[0].amount, Decimal::from(80));
        assert_eq!(agg.expense_groups().count(), 0);
        assert_eq!(agg.income.len(), agg.expense.len());
    }

    #[test]
    fn test_same_name_different_iban_kept_apart() {
        let txns = vec![txn("Alice", "NL01X", 100), txn("Alice", "NL02Y", -30)];
        let agg = aggregate(&txns, ZeroSumPolicy::Exclude);
        assert_eq!(agg.income_groups().count(), 1);
        assert_eq!(agg.expense_groups().count(), 1);
    }

    #[test]
    fn test_each_group_on_one_side_and_padded() {
        let txns = vec![
            txn("Employer", "NL10", 2500),
            txn("Shop", "NL20", -40),
            txn("Shop", "NL20", -15),
            txn("Landlord", "NL30", -900),
            txn("Gym", "NL40", -30),
        ];
        let agg = aggregate(&txns, ZeroSumPolicy::Exclude);

        assert_eq!(agg.income.len(), agg.expense.len());
        assert_eq!(agg.len(), 3);

        let income: HashSet<_> = agg.income_groups().map(|g| g.name.as_str()).collect();
        let expense: HashSet<_> = agg.expense_groups().map(|g| g.name.as_str()).collect();
        assert!(income.is_disjoint(&expense));
        assert_eq!(income, HashSet::from(["Employer"]));
        assert_eq!(expense, HashSet::from(["Shop", "Landlord", "Gym"]));

        let shop = agg.expense_groups().find(|g| g.name == "Shop").unwrap();
        assert_eq!(shop.amount, Decimal::from(-55));

        let padding = agg
            .income
            .iter()
            .filter(|e| **e == AggregateEntry::Padding)
            .count();
        assert_eq!(padding, 2);
    }

    #[test]
    fn test_zero_sum_policy() {
        let txns = vec![txn("Friend", "NL01", 25), txn("Friend", "NL01", -25)];

        let excluded = aggregate(&txns, ZeroSumPolicy::Exclude);
        assert!(excluded.is_empty());

        let income = aggregate(&txns, ZeroSumPolicy::Income);
        assert_eq!(income.income_groups().count(), 1);
        assert_eq!(income.expense_groups().count(), 0);
    }

    #[test]
    fn test_rows_leave_padding_empty() {
        let txns = vec![txn("Employer", "NL10", 100), txn("Shop", "NL20", -5), txn("Bar", "NL30", -7)];
        let rows = aggregate(&txns, ZeroSumPolicy::Exclude).rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].income_name.as_deref(), Some("Employer"));
        assert_eq!(rows[1].income_name, None);
        assert_eq!(rows[1].income_amount, None);
        assert!(rows.iter().all(|r| r.expense_amount.is_some()));
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            zero_sum: ZeroSumPolicy,
        }
        let w: Wrapper = toml::from_str("zero_sum = \"income\"").unwrap();
        assert_eq!(w.zero_sum, ZeroSumPolicy::Income);
    }
}
