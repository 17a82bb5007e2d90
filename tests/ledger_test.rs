mod common;

use anyhow::Result;
use common::{dec, post, test_service};
use scriba::domain::Amount;

#[tokio::test]
async fn test_rebuild_nets_debits_against_credits() -> Result<()> {
    let (service, _temp) = test_service().await?;

    post(&service, "2024-01-01", "CASH", "seed", "1000", "0").await?;
    post(&service, "2024-01-02", "CASH", "spend", "0", "300").await?;

    let balances = service.rebuild_ledger().await?;
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].account, "CASH");
    assert_eq!(balances[0].balance, dec("700"));

    // The persisted snapshot matches what the rebuild returned
    let stored = service.list_ledger().await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].account, "CASH");
    assert_eq!(stored[0].balance, dec("700"));
    Ok(())
}

#[tokio::test]
async fn test_one_row_per_distinct_account() -> Result<()> {
    let (service, _temp) = test_service().await?;

    post(&service, "2024-01-01", "CASH", "seed", "1000", "0").await?;
    post(&service, "2024-01-02", "LOAN", "draw", "0", "500").await?;
    post(&service, "2024-01-03", "CASH", "spend", "0", "300").await?;
    post(&service, "2024-01-04", "RENT", "january", "800", "0").await?;

    let balances = service.rebuild_ledger().await?;
    assert_eq!(balances.len(), 3);

    let accounts: Vec<&str> = balances.iter().map(|b| b.account.as_str()).collect();
    assert_eq!(accounts, vec!["CASH", "LOAN", "RENT"]);
    Ok(())
}

#[tokio::test]
async fn test_zero_balance_account_keeps_its_row() -> Result<()> {
    let (service, _temp) = test_service().await?;

    post(&service, "2024-01-01", "EQUIP", "purchase", "200", "0").await?;
    post(&service, "2024-01-02", "EQUIP", "write-off", "0", "200").await?;

    let balances = service.rebuild_ledger().await?;
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].account, "EQUIP");
    assert_eq!(balances[0].balance, Amount::ZERO);
    Ok(())
}

#[tokio::test]
async fn test_rebuild_is_idempotent() -> Result<()> {
    let (service, _temp) = test_service().await?;

    post(&service, "2024-01-01", "CASH", "seed", "1000", "0").await?;
    post(&service, "2024-01-02", "LOAN", "draw", "0", "500").await?;

    service.rebuild_ledger().await?;
    let first: Vec<(String, Amount)> = service
        .list_ledger()
        .await?
        .into_iter()
        .map(|b| (b.account, b.balance))
        .collect();

    service.rebuild_ledger().await?;
    let second: Vec<(String, Amount)> = service
        .list_ledger()
        .await?
        .into_iter()
        .map(|b| (b.account, b.balance))
        .collect();

    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_rebuild_replaces_previous_snapshot() -> Result<()> {
    let (service, _temp) = test_service().await?;

    post(&service, "2024-01-01", "CASH", "seed", "1000", "0").await?;
    service.rebuild_ledger().await?;
    assert_eq!(service.list_ledger().await?.len(), 1);

    post(&service, "2024-01-02", "CASH", "spend", "0", "300").await?;
    post(&service, "2024-01-03", "LOAN", "draw", "0", "500").await?;
    service.rebuild_ledger().await?;

    let balances = service.list_ledger().await?;
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].account, "CASH");
    assert_eq!(balances[0].balance, dec("700"));
    assert_eq!(balances[1].account, "LOAN");
    assert_eq!(balances[1].balance, dec("-500"));
    Ok(())
}

#[tokio::test]
async fn test_snapshot_is_stale_until_rebuilt() -> Result<()> {
    let (service, _temp) = test_service().await?;

    post(&service, "2024-01-01", "CASH", "seed", "1000", "0").await?;
    service.rebuild_ledger().await?;

    // New journal entries do not touch the ledger until the next rebuild
    post(&service, "2024-01-02", "CASH", "spend", "0", "300").await?;
    let stale = service.list_ledger().await?;
    assert_eq!(stale[0].balance, dec("1000"));

    service.rebuild_ledger().await?;
    let fresh = service.list_ledger().await?;
    assert_eq!(fresh[0].balance, dec("700"));
    Ok(())
}

#[tokio::test]
async fn test_empty_journal_yields_empty_ledger() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let balances = service.rebuild_ledger().await?;
    assert!(balances.is_empty());
    assert!(service.list_ledger().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_sums_use_exact_decimal_arithmetic() -> Result<()> {
    let (service, _temp) = test_service().await?;

    post(&service, "2024-01-01", "FEES", "a", "0.1", "0").await?;
    post(&service, "2024-01-02", "FEES", "b", "0.2", "0").await?;

    let balances = service.rebuild_ledger().await?;
    assert_eq!(balances[0].balance, dec("0.3"));
    Ok(())
}
