//! Property tests for the posting engine.

use chrono::NaiveDate;
use ifrs_shared::config::PostingConfig;
use ifrs_shared::types::{AccountId, Currency};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::EntryType;
use super::journal::Journal;
use super::posting::PostingService;
use crate::account::{AccountType, ChartOfAccounts};
use crate::entity::Entity;
use crate::fiscal::PeriodCalendar;
use crate::transaction::{LineItem, Transaction, TransactionType, Vat};

struct Books {
    entity: Entity,
    chart: ChartOfAccounts,
    calendar: PeriodCalendar,
    config: PostingConfig,
    journal: Journal,
    receivable: AccountId,
    revenue: AccountId,
    vat_control: AccountId,
}

fn books() -> Books {
    let usd = Currency::new("USD").unwrap();
    let entity = Entity::new("Props Ltd", usd.clone());
    let mut chart = ChartOfAccounts::new();
    let receivable = chart
        .add(entity.id, "Clients", AccountType::Receivable, usd.clone())
        .unwrap();
    let revenue = chart
        .add(entity.id, "Sales", AccountType::OperatingRevenue, usd.clone())
        .unwrap();
    let vat_control = chart
        .add(entity.id, "VAT Control", AccountType::ControlAccount, usd)
        .unwrap();
    let mut calendar = PeriodCalendar::new();
    calendar.add_year(&entity, 2026).unwrap();
    let journal = Journal::new(entity.id);
    Books {
        entity,
        chart,
        calendar,
        config: PostingConfig::default(),
        journal,
        receivable,
        revenue,
        vat_control,
    }
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    // Cents between 0.01 and 100_000.00.
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn vat_rate_strategy() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![
        Just(None),
        (1u32..=30).prop_map(|pct| Some(Decimal::from(pct))),
    ]
}

proptest! {
    #[test]
    fn posted_batches_always_balance(
        lines in prop::collection::vec((amount_strategy(), vat_rate_strategy()), 1..8),
    ) {
        let mut books = books();
        let mut txn = Transaction::new(
            books.entity.id,
            TransactionType::ClientInvoice,
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            books.receivable,
            Currency::new("USD").unwrap(),
            Decimal::ONE,
            "IN0001/2026",
            "Property invoice",
        );
        for (amount, rate) in &lines {
            let mut line = LineItem::new(books.revenue, *amount).unwrap();
            if let Some(rate) = rate {
                let vat = Vat::new("VAT", "Test", *rate, Some(books.vat_control)).unwrap();
                line = line.with_vat(vat, false);
            }
            txn.add_line_item(line).unwrap();
        }

        PostingService::post(
            &books.entity,
            &books.chart,
            &books.calendar,
            &books.config,
            &mut books.journal,
            &mut txn,
        )
        .unwrap();

        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for row in books.journal.entries() {
            match row.entry_type {
                EntryType::Debit => debits += row.functional_amount,
                EntryType::Credit => credits += row.functional_amount,
            }
        }
        prop_assert_eq!(debits, credits);
        prop_assert!(books.journal.verify().is_ok());
    }

    #[test]
    fn main_account_carries_the_gross_amount(
        lines in prop::collection::vec((amount_strategy(), vat_rate_strategy()), 1..8),
    ) {
        let mut books = books();
        let mut txn = Transaction::new(
            books.entity.id,
            TransactionType::ClientInvoice,
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            books.receivable,
            Currency::new("USD").unwrap(),
            Decimal::ONE,
            "IN0002/2026",
            "Property invoice",
        );
        for (amount, rate) in &lines {
            let mut line = LineItem::new(books.revenue, *amount).unwrap();
            if let Some(rate) = rate {
                let vat = Vat::new("VAT", "Test", *rate, Some(books.vat_control)).unwrap();
                line = line.with_vat(vat, false);
            }
            txn.add_line_item(line).unwrap();
        }
        let expected: Decimal = txn.line_items.iter().map(LineItem::gross_amount).sum();

        PostingService::post(
            &books.entity,
            &books.chart,
            &books.calendar,
            &books.config,
            &mut books.journal,
            &mut txn,
        )
        .unwrap();

        let (debits, credits) = books
            .journal
            .totals_for_account(books.receivable, None, None);
        prop_assert_eq!(credits, Decimal::ZERO);
        prop_assert_eq!(debits, expected);
    }

    #[test]
    fn repeated_postings_keep_the_chain_intact(batches in 1usize..6) {
        let mut books = books();
        for i in 0..batches {
            let mut txn = Transaction::new(
                books.entity.id,
                TransactionType::ClientInvoice,
                NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
                books.receivable,
                Currency::new("USD").unwrap(),
                Decimal::ONE,
                format!("IN{:04}/2026", i + 1),
                "Chain invoice",
            );
            txn.add_line_item(LineItem::new(books.revenue, Decimal::from(100)).unwrap())
                .unwrap();
            PostingService::post(
                &books.entity,
                &books.chart,
                &books.calendar,
                &books.config,
                &mut books.journal,
                &mut txn,
            )
            .unwrap();
        }
        prop_assert_eq!(books.journal.len(), batches * 2);
        prop_assert!(books.journal.verify().is_ok());
    }
}
