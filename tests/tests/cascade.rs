use cairn::{stmt::Path, Many, Ref};
use pretty_assertions::assert_eq;
use tests::{assert_err, assert_ok, models, models::*, setup};

fn rex_in(city: &str) -> Animal {
    Animal {
        name: "Rex".to_string(),
        location: Ref::new(Location {
            city: city.to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn auto_create_saves_the_reference_first() {
    let (db, log) = setup(models!(Country, Location, Animal)).await;

    let rex = assert_ok!(db.create::<Animal>().run_with_error(rex_in("Lyon")).await);

    let location = rex.location.get().expect("location stays loaded");
    let location_id = location.id.expect("location was created");
    assert_eq!(rex.location.id(), Some(location_id));

    assert_eq!(
        log.statements(),
        [
            "BEGIN",
            r#"INSERT INTO "locations" ("city", "country_id") VALUES (?1, ?2);"#,
            r#"INSERT INTO "animals" ("name", "location_id") VALUES (?1, ?2);"#,
            "COMMIT",
        ]
    );

    let loaded = assert_ok!(db.query::<Animal>().first().await).expect("animal was stored");
    assert_eq!(loaded.location, Ref::Id(location_id));
}

#[tokio::test]
async fn unsaved_reference_without_cascade_fails() {
    let (db, _) = setup(models!(Country, Location, Animal)).await;

    let paris = Location {
        city: "Paris".to_string(),
        country: Ref::new(france()),
        ..Default::default()
    };

    let err = assert_err!(db.create::<Location>().run_with_error(paris).await);
    assert!(err.is_invalid_statement());
    assert!(err.to_string().contains("member `country`"));

    assert!(!db.exist::<Country>().run().await);
    assert!(!db.exist::<Location>().run().await);
}

#[tokio::test]
async fn failed_cascade_leaves_no_rows() {
    let (db, log) = setup(models!(Country, Location, Animal, Toy, Kennel)).await;

    // The guard is created first, then the kennel; linking the unsaved toy
    // fails because the kennel's toys have no create cascade.
    let kennel = Kennel {
        name: "North".to_string(),
        guard: Ref::new(rex_in("Oslo")),
        toys: Many::from(vec![toy("bone")]),
        ..Default::default()
    };

    let err = assert_err!(db.create::<Kennel>().run_with_error(kennel).await);
    assert!(err.is_invalid_statement());

    let statements = log.statements();
    assert_eq!(statements.first().map(String::as_str), Some("BEGIN"));
    assert_eq!(statements.last().map(String::as_str), Some("ROLLBACK"));
    assert_eq!(
        statements
            .iter()
            .filter(|sql| sql.starts_with("INSERT"))
            .count(),
        3
    );

    assert!(!db.exist::<Kennel>().run().await);
    assert!(!db.exist::<Animal>().run().await);
    assert!(!db.exist::<Location>().run().await);
    assert!(!db.exist::<Toy>().run().await);
}

#[tokio::test]
async fn auto_update_follows_loaded_references() {
    let (db, _) = setup(models!(Country, Location, Animal)).await;

    let mut rex = assert_ok!(db.create::<Animal>().run_with_error(rex_in("Lyon")).await);

    rex.location
        .get_mut()
        .expect("location stays loaded")
        .city = "Marseille".to_string();

    let rex = assert_ok!(db.update::<Animal>().run_with_error(rex).await);

    let mut query = db.query::<Location>();
    query.where_generic(Path::<Location, String>::new("city").eq("Marseille"));
    let locations = assert_ok!(query.run_with_error().await);

    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].id, rex.location.id());
}

#[tokio::test]
async fn update_creates_new_references() {
    let (db, _) = setup(models!(Country, Location, Animal)).await;

    let mut rex = assert_ok!(
        db.create::<Animal>()
            .run_with_error(Animal {
                name: "Rex".to_string(),
                ..Default::default()
            })
            .await
    );
    assert!(rex.location.is_unset());

    rex.location = Ref::new(Location {
        city: "Nice".to_string(),
        ..Default::default()
    });

    let rex = assert_ok!(db.update::<Animal>().run_with_error(rex).await);
    assert!(rex.location.id().is_some());
    assert!(db.exist::<Location>().run().await);
}

#[tokio::test]
async fn auto_delete_removes_dependents_after_the_owner() {
    let (db, log) = setup(models!(Country, Location, Animal, Toy, Kennel)).await;

    let kennel = assert_ok!(
        db.create::<Kennel>()
            .run_with_error(Kennel {
                name: "North".to_string(),
                guard: Ref::new(Animal {
                    name: "Rex".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await
    );

    log.clear();

    let mut delete = db.delete::<Kennel>();
    delete.item(&kennel);
    assert_eq!(assert_ok!(delete.run_with_error().await), 1);

    let deletes: Vec<_> = log
        .statements()
        .into_iter()
        .filter(|sql| sql.starts_with("DELETE"))
        .collect();
    assert_eq!(
        deletes,
        [
            r#"DELETE FROM "kennels_toys_toys_link" WHERE "owner_id" IN (?1);"#,
            r#"DELETE FROM "kennels" WHERE "id" IN (?1);"#,
            r#"DELETE FROM "animals" WHERE "id" IN (?1);"#,
        ]
    );

    assert!(!db.exist::<Kennel>().run().await);
    assert!(!db.exist::<Animal>().run().await);
}

#[tokio::test]
async fn auto_delete_detaches_nullable_references_first() {
    let (db, log) = setup(models!(Country, Location, Animal, Shelter)).await;

    let shelter = assert_ok!(
        db.create::<Shelter>()
            .run_with_error(Shelter {
                name: "Harbor".to_string(),
                resident: Ref::new(Animal {
                    name: "Rex".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await
    );
    assert!(shelter.resident.id().is_some());

    log.clear();

    let mut delete = db.delete::<Shelter>();
    delete.item(&shelter);
    assert_eq!(assert_ok!(delete.run_with_error().await), 1);

    let writes: Vec<_> = log
        .statements()
        .into_iter()
        .filter(|sql| sql.starts_with("UPDATE") || sql.starts_with("DELETE"))
        .collect();
    assert_eq!(
        writes,
        [
            r#"UPDATE "shelters" SET "resident_id" = ?1 WHERE "id" IN (?2);"#,
            r#"DELETE FROM "animals" WHERE "id" IN (?1);"#,
            r#"DELETE FROM "shelters" WHERE "id" IN (?1);"#,
        ]
    );
    assert_eq!(log.statements().last().map(String::as_str), Some("COMMIT"));

    assert!(!db.exist::<Shelter>().run().await);
    assert!(!db.exist::<Animal>().run().await);
}

#[tokio::test]
async fn rejected_dependent_insert_rolls_back() {
    let (db, log) = setup(models!(Country, Location, Animal, Toy, Kennel)).await;

    // The guard's new location points at a country that does not exist
    let kennel = Kennel {
        name: "North".to_string(),
        guard: Ref::new(Animal {
            name: "Rex".to_string(),
            location: Ref::new(Location {
                city: "Nowhere".to_string(),
                country: Ref::Id(999),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    };

    let err = assert_err!(db.create::<Kennel>().run_with_error(kennel).await);
    assert!(err.is_driver());

    let statements = log.statements();
    assert_eq!(statements.last().map(String::as_str), Some("ROLLBACK"));
    assert!(statements
        .iter()
        .all(|sql| !sql.starts_with(r#"INSERT INTO "kennels""#)));

    assert!(!db.exist::<Kennel>().run().await);
    assert!(!db.exist::<Animal>().run().await);
    assert!(!db.exist::<Location>().run().await);
}
