use cairn::stmt::Path;
use pretty_assertions::assert_eq;
use tests::{assert_err, assert_ok, models, models::*, setup};

#[tokio::test]
async fn derived_entities_are_stored_across_tables() {
    let (db, log) = setup(models!(Country, Location, Animal, Cat)).await;

    let tom = assert_ok!(db.create::<Animal>().run_with_error(cat("Tom", 9)).await);
    let id = tom.id.expect("key was generated");

    let inserts: Vec<_> = log
        .statements()
        .into_iter()
        .filter(|sql| sql.starts_with("INSERT"))
        .collect();
    assert_eq!(
        inserts,
        [
            r#"INSERT INTO "animals" ("name", "location_id") VALUES (?1, ?2);"#,
            r#"INSERT INTO "cats" ("id", "lives", "indoor") VALUES (?1, ?2, ?3);"#,
        ]
    );

    let animals = db.query::<Animal>().run().await;
    assert_eq!(
        animals,
        [Animal {
            id: Some(id),
            name: "Tom".to_string(),
            ..Default::default()
        }]
    );

    let cats = db.query::<Cat>().run().await;
    assert_eq!(cats, [tom]);
}

#[tokio::test]
async fn base_queries_filter_on_inherited_members() {
    let (db, _) = setup(models!(Country, Location, Animal, Cat)).await;

    assert_ok!(db.create::<Cat>().run_with_error(cat("Tom", 9)).await);
    assert_ok!(
        db.create::<Animal>()
            .run_with_error(Animal {
                name: "Rex".to_string(),
                ..Default::default()
            })
            .await
    );

    let mut query = db.query::<Cat>();
    query.where_generic(Path::<Cat, String>::new("name").starts_with("T"));
    assert_eq!(query.run().await.len(), 1);

    // Plain animals have no row in `cats`
    assert_eq!(db.query::<Cat>().run().await.len(), 1);
    assert_eq!(db.query::<Animal>().run().await.len(), 2);
}

#[tokio::test]
async fn deleting_through_the_base_removes_every_row() {
    let (db, log) = setup(models!(Country, Location, Animal, Cat)).await;

    assert_ok!(db.create::<Cat>().run_with_error(cat("Tom", 9)).await);
    log.clear();

    let mut delete = db.delete::<Animal>();
    delete.where_generic(Path::<Animal, String>::new("name").eq("Tom"));
    assert_eq!(assert_ok!(delete.run_with_error().await), 1);

    let deletes: Vec<_> = log
        .statements()
        .into_iter()
        .filter(|sql| sql.starts_with("DELETE"))
        .collect();
    assert_eq!(
        deletes,
        [
            r#"DELETE FROM "cats" WHERE "id" IN (?1);"#,
            r#"DELETE FROM "animals" WHERE "id" IN (?1);"#,
        ]
    );

    assert!(db.query::<Cat>().run().await.is_empty());
    assert!(db.query::<Animal>().run().await.is_empty());
}

#[tokio::test]
async fn unrelated_types_are_rejected() {
    let (db, log) = setup(models!(Country, Location, Animal, Cat, Toy)).await;

    let err = assert_err!(db.create::<Animal>().run_with_error(toy("ball")).await);
    assert!(err.is_invalid_statement());
    assert_eq!(err.to_string(), "invalid statement: `Toy` is not a `Animal`");

    let err = assert_err!(db.update::<Cat>().run_with_error(toy("ball")).await);
    assert_eq!(err.to_string(), "invalid statement: `Toy` is not a `Cat`");

    // Nothing reached the database for the rejected create
    assert!(log.statements().iter().all(|sql| !sql.contains("toys")));
}
