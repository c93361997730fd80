use cairn::{stmt::Path, Ref};
use tests::{assert_err, assert_ok, models, models::*, setup};

#[tokio::test]
async fn create_then_query_by_key() {
    let (db, _) = setup(models!(Country)).await;

    let created = assert_ok!(db.create::<Country>().run_with_error(france()).await);
    let id = created.id.expect("generated key is written back");

    let mut query = db.query::<Country>();
    query.where_generic(Path::<Country, i64>::new("id").eq(id));

    assert_eq!(assert_ok!(query.run_with_error().await), vec![created]);
}

#[tokio::test]
async fn not_in_db_members_are_not_stored() {
    let (db, _) = setup(models!(Country, Location, Animal, Cat)).await;

    let mut tom = cat("Tom", 9);
    tom.indoor = true;
    tom.mood = "grumpy".to_string();

    let mut tom = assert_ok!(db.create::<Cat>().run_with_error(tom).await);
    assert_eq!(tom.mood, "grumpy");

    tom.lives = 8;
    let tom = assert_ok!(db.update::<Cat>().run_with_error(tom).await);
    assert_eq!(tom.mood, "grumpy");

    let loaded = assert_ok!(db.query::<Cat>().first().await).expect("cat was stored");
    assert_eq!(loaded.mood, "");
    assert_eq!(
        loaded,
        Cat {
            mood: String::new(),
            ..tom
        }
    );
}

#[tokio::test]
async fn update_writes_every_member() {
    let (db, log) = setup(models!(Country, Location, Animal, Cat)).await;

    let mut tom = assert_ok!(db.create::<Cat>().run_with_error(cat("Tom", 9)).await);
    tom.name = "Thomas".to_string();
    tom.lives = 8;

    log.clear();
    let tom = assert_ok!(db.update::<Cat>().run_with_error(tom).await);

    assert_eq!(
        log.statements(),
        [
            "BEGIN",
            r#"UPDATE "cats" SET "lives" = ?1, "indoor" = ?2 WHERE "id" = ?3;"#,
            r#"UPDATE "animals" SET "name" = ?1, "location_id" = ?2 WHERE "id" = ?3;"#,
            "COMMIT",
        ]
    );

    let loaded = assert_ok!(db.query::<Cat>().first().await).expect("cat was stored");
    assert_eq!(loaded, tom);
    assert_eq!(loaded.name, "Thomas");
    assert_eq!(loaded.lives, 8);
}

#[tokio::test]
async fn update_requires_a_stored_entity() {
    let (db, _) = setup(models!(Country, Location, Animal, Cat)).await;

    let err = assert_err!(db.update::<Cat>().run_with_error(cat("Ghost", 1)).await);
    assert!(err.is_invalid_statement());

    let mut ghost = cat("Ghost", 1);
    ghost.id = Some(42);
    let err = assert_err!(db.update::<Cat>().run_with_error(ghost).await);
    assert!(err.is_record_not_found());
    assert_eq!(err.to_string(), "record not found: table=cats key=42");
}

#[tokio::test]
async fn create_rejects_saved_entities() {
    let (db, log) = setup(models!(Country)).await;

    let country = assert_ok!(db.create::<Country>().run_with_error(france()).await);

    log.clear();
    let err = assert_err!(db.create::<Country>().run_with_error(country.clone()).await);
    assert!(err.is_invalid_statement());
    assert_eq!(log.statements(), ["BEGIN", "ROLLBACK"]);

    // The swallowing form hands the item back untouched
    assert_eq!(db.create::<Country>().run(country.clone()).await, country);
}

#[tokio::test]
async fn delete_by_item() {
    let (db, _) = setup(models!(Country, Location, Animal, Cat)).await;

    let tom = assert_ok!(db.create::<Cat>().run_with_error(cat("Tom", 9)).await);
    let felix = assert_ok!(db.create::<Cat>().run_with_error(cat("Felix", 3)).await);

    let mut delete = db.delete::<Cat>();
    delete.item(&tom);
    assert_eq!(assert_ok!(delete.run_with_error().await), 1);

    let remaining = assert_ok!(db.query::<Cat>().run_with_error().await);
    assert_eq!(remaining, vec![felix]);

    // The ancestor row went with it
    let animals = assert_ok!(db.query::<Animal>().run_with_error().await);
    assert_eq!(animals.len(), 1);
    assert_eq!(animals[0].name, "Felix");
}

#[tokio::test]
async fn delete_by_filter() {
    let (db, _) = setup(models!(Country, Location, Animal, Cat)).await;

    for (name, lives) in [("Tom", 9), ("Felix", 3), ("Kitty", 1)] {
        assert_ok!(db.create::<Cat>().run_with_error(cat(name, lives)).await);
    }

    let mut delete = db.delete::<Cat>();
    delete.where_generic(Path::<Cat, i64>::new("lives").lt(5));
    assert_eq!(assert_ok!(delete.run_with_error().await), 2);

    let names: Vec<_> = db
        .query::<Cat>()
        .run()
        .await
        .into_iter()
        .map(|cat| cat.name)
        .collect();
    assert_eq!(names, ["Tom"]);
}

#[tokio::test]
async fn deleting_an_unsaved_item_fails() {
    let (db, _) = setup(models!(Country, Location, Animal, Cat)).await;

    let mut delete = db.delete::<Cat>();
    delete.item(&cat("Tom", 9));

    let err = assert_err!(delete.run_with_error().await);
    assert!(err.is_invalid_statement());
    assert!(!delete.run().await);
}

#[tokio::test]
async fn filter_through_references() {
    let (db, _) = setup(models!(Country, Location, Animal)).await;

    let fr = assert_ok!(db.create::<Country>().run_with_error(france()).await);
    let de = assert_ok!(
        db.create::<Country>()
            .run_with_error(Country {
                short_name: "DE".to_string(),
                name: "Germany".to_string(),
                ..Default::default()
            })
            .await
    );

    for (name, city, country) in [("Rex", "Paris", &fr), ("Bello", "Berlin", &de)] {
        let animal = Animal {
            name: name.to_string(),
            location: Ref::new(Location {
                city: city.to_string(),
                country: Ref::Id(country.id.unwrap()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_ok!(db.create::<Animal>().run_with_error(animal).await);
    }

    let mut query = db.query::<Animal>();
    query.where_generic(
        Path::<Animal, Ref<Location>>::new("location")
            .to::<Ref<Country>>("country")
            .to::<String>("short_name")
            .eq("FR"),
    );

    let found = assert_ok!(query.run_with_error().await);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Rex");

    // Short links by default
    assert!(matches!(found[0].location, Ref::Id(_)));
}

#[tokio::test]
async fn translation_errors_are_reported_in_order() {
    let (db, _) = setup(models!(Country)).await;

    let mut query = db.query::<Country>();
    query
        .where_generic(Path::<Country, String>::new("nme").eq("x"))
        .where_generic(Path::<Country, String>::new("short_name").eq("FR"))
        .where_generic(Path::<Country, i64>::new("population").gt(3));

    let err = assert_err!(query.run_with_error().await);
    let errors = err.errors();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|err| err.is_translation()));
    assert!(errors[0].to_string().contains("nme"));
    assert!(errors[1].to_string().contains("population"));

    // The swallowing form degrades to no rows
    assert!(query.run().await.is_empty());
}

#[tokio::test]
async fn get_table_info() {
    let (db, _) = setup(models!(Country, Location, Animal, Cat)).await;

    let cats = assert_ok!(db.get_table_info::<Cat>());
    assert_eq!(cats.name, "cats");
    assert_eq!(cats.key, "id");
    assert_eq!(cats.columns().collect::<Vec<_>>(), ["id", "lives", "indoor"]);
    assert_eq!(cats.ancestors.len(), 1);

    let animals = assert_ok!(db.get_table_info::<Animal>());
    assert_eq!(cats.parent(), Some(animals.id));

    let err = assert_err!(db.get_table_info::<Toy>());
    assert!(err.is_invalid_schema());
}
