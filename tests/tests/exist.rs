use cairn::stmt::Path;
use tests::{assert_ok, models, models::*, setup};

#[tokio::test]
async fn exist_reads_a_single_row() {
    let (db, log) = setup(models!(Country)).await;

    let mut exist = db.exist::<Country>();
    exist.where_generic(Path::<Country, String>::new("short_name").eq("FR"));
    assert!(!assert_ok!(exist.run_with_error().await));

    assert_ok!(db.create::<Country>().run_with_error(france()).await);
    log.clear();

    assert!(exist.run().await);
    assert_eq!(
        log.statements(),
        [r#"SELECT 1 FROM "countries" AS "t0" WHERE "t0"."short_name" = 'FR' LIMIT 1;"#]
    );
}

#[tokio::test]
async fn exist_without_filters_checks_the_table() {
    let (db, _) = setup(models!(Country, Location, Animal, Cat)).await;

    assert!(!db.exist::<Animal>().run().await);

    assert_ok!(db.create::<Cat>().run_with_error(cat("Tom", 9)).await);
    assert!(db.exist::<Animal>().run().await);
    assert!(db.exist::<Cat>().run().await);
}

#[tokio::test]
async fn failed_checks_report_false() {
    let (db, log) = setup(models!(Country)).await;
    assert_ok!(db.create::<Country>().run_with_error(france()).await);
    log.clear();

    let mut exist = db.exist::<Country>();
    exist.where_generic(Path::<Country, String>::new("capital").eq("Paris"));

    assert!(!exist.run().await);
    assert!(exist.run_with_error().await.unwrap_err().is_translation());
    assert!(log.is_empty());
}
