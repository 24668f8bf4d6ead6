//! Property tests for the clearance engine.

use chrono::NaiveDate;
use ifrs_shared::config::PostingConfig;
use ifrs_shared::types::{AccountId, Currency};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::{AssignmentLog, ClearingService};
use crate::account::{AccountType, ChartOfAccounts};
use crate::entity::Entity;
use crate::fiscal::PeriodCalendar;
use crate::ledger::{Journal, PostingService};
use crate::transaction::{LineItem, Transaction, TransactionType};

struct Books {
    entity: Entity,
    chart: ChartOfAccounts,
    calendar: PeriodCalendar,
    config: PostingConfig,
    journal: Journal,
    log: AssignmentLog,
    receivable: AccountId,
    revenue: AccountId,
    bank: AccountId,
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
    let bank = chart
        .add(entity.id, "Main Bank", AccountType::Bank, usd)
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
        log: AssignmentLog::new(),
        receivable,
        revenue,
        bank,
    }
}

fn post(books: &mut Books, transaction_type: TransactionType, amount: Decimal) -> Transaction {
    let line_account = match transaction_type {
        TransactionType::ClientInvoice => books.revenue,
        _ => books.bank,
    };
    let mut txn = Transaction::new(
        books.entity.id,
        transaction_type,
        NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        books.receivable,
        Currency::new("USD").unwrap(),
        Decimal::ONE,
        format!("{}0001/2026", transaction_type.prefix()),
        "Clearance property",
    );
    txn.add_line_item(LineItem::new(line_account, amount).unwrap())
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
    txn
}

fn cents(raw: i64) -> Decimal {
    Decimal::new(raw, 2)
}

proptest! {
    #[test]
    fn cumulative_clearance_never_exceeds_the_invoice(
        invoice_cents in 100i64..1_000_000,
        receipt_cents in prop::collection::vec(1i64..1_000_000, 1..10),
    ) {
        let mut books = books();
        let invoice = post(&mut books, TransactionType::ClientInvoice, cents(invoice_cents));

        for raw in receipt_cents {
            let receipt = post(&mut books, TransactionType::ClientReceipt, cents(raw));
            let outstanding = ClearingService::outstanding(&books.log, &invoice);
            let amount = cents(raw).min(outstanding);
            if amount > Decimal::ZERO {
                ClearingService::assign(
                    &books.entity,
                    &books.config,
                    &mut books.log,
                    &mut books.journal,
                    &invoice,
                    &receipt,
                    amount,
                )
                .unwrap();
            }
            prop_assert!(books.log.cleared_total(invoice.id) <= invoice.amount());
            prop_assert!(
                ClearingService::outstanding(&books.log, &invoice) >= Decimal::ZERO
            );
        }
    }

    #[test]
    fn assign_then_unassign_is_a_no_op_on_balances(
        invoice_cents in 100i64..1_000_000,
        cleared_cents in 1i64..100,
    ) {
        let mut books = books();
        let invoice = post(&mut books, TransactionType::ClientInvoice, cents(invoice_cents));
        let receipt = post(&mut books, TransactionType::ClientReceipt, cents(invoice_cents));

        let amount = cents(cleared_cents);
        let id = ClearingService::assign(
            &books.entity,
            &books.config,
            &mut books.log,
            &mut books.journal,
            &invoice,
            &receipt,
            amount,
        )
        .unwrap();
        ClearingService::unassign(&books.entity, &mut books.log, &mut books.journal, id)
            .unwrap();

        prop_assert_eq!(books.log.cleared_total(invoice.id), Decimal::ZERO);
        prop_assert_eq!(books.log.assigned_total(receipt.id), Decimal::ZERO);
        prop_assert_eq!(
            ClearingService::outstanding(&books.log, &invoice),
            invoice.amount()
        );
    }

    #[test]
    fn fifo_clearing_exhausts_either_side(
        invoices in prop::collection::vec(100i64..100_000, 1..6),
        receipt_cents in 100i64..500_000,
    ) {
        let mut books = books();
        let posted: Vec<Transaction> = invoices
            .iter()
            .map(|&raw| post(&mut books, TransactionType::ClientInvoice, cents(raw)))
            .collect();
        let receipt = post(&mut books, TransactionType::ClientReceipt, cents(receipt_cents));

        let refs: Vec<&Transaction> = posted.iter().collect();
        ClearingService::clear_fifo(
            &books.entity,
            &books.config,
            &mut books.log,
            &mut books.journal,
            &receipt,
            &refs,
        )
        .unwrap();

        let total_invoiced: Decimal = posted.iter().map(Transaction::amount).sum();
        let assigned = books.log.assigned_total(receipt.id);
        prop_assert_eq!(assigned, receipt.amount().min(total_invoiced));
    }
}
