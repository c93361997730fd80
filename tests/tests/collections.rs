use cairn::{stmt::Path, Many};
use tests::{assert_ok, models, models::*, setup};

fn labels(owner: &Owner) -> Vec<&str> {
    owner.toys.iter().map(|toy| toy.label.as_str()).collect()
}

async fn load_ann(db: &cairn::Db) -> Owner {
    let mut query = db.query::<Owner>();
    query.include_generic(Path::<Owner, Many<Toy>>::new("toys"));
    assert_ok!(query.first().await).expect("owner was stored")
}

#[tokio::test]
async fn added_elements_are_linked_once() {
    let (db, _) = setup(models!(Country, Location, Animal, Toy, Owner)).await;

    let ann = assert_ok!(
        db.create::<Owner>()
            .run_with_error(Owner {
                name: "Ann".to_string(),
                toys: vec![toy("ball")].into(),
                ..Default::default()
            })
            .await
    );
    assert!(ann.toys.iter().all(|toy| toy.id.is_some()));

    let mut ann = load_ann(&db).await;
    assert_eq!(labels(&ann), ["ball"]);

    ann.toys.push(toy("rope"));
    let ann = assert_ok!(db.update::<Owner>().run_with_error(ann).await);

    // Saving again without changes adds nothing
    assert_ok!(db.update::<Owner>().run_with_error(ann).await);

    let ann = load_ann(&db).await;
    assert_eq!(labels(&ann), ["ball", "rope"]);
}

#[tokio::test]
async fn collections_load_only_when_included() {
    let (db, log) = setup(models!(Country, Location, Animal, Toy, Owner)).await;

    assert_ok!(
        db.create::<Owner>()
            .run_with_error(Owner {
                name: "Ann".to_string(),
                toys: vec![toy("ball"), toy("rope")].into(),
                ..Default::default()
            })
            .await
    );

    log.clear();
    let mut plain = assert_ok!(db.query::<Owner>().first().await).expect("owner was stored");
    assert!(!plain.toys.is_loaded());
    assert_eq!(log.len(), 1);

    // Saving an owner whose toys were not loaded keeps the links
    plain.name = "Anna".to_string();
    assert_ok!(db.update::<Owner>().run_with_error(plain).await);

    log.clear();
    let ann = load_ann(&db).await;
    assert_eq!(ann.name, "Anna");
    assert_eq!(labels(&ann), ["ball", "rope"]);

    assert_eq!(
        log.statements()[1],
        r#"SELECT "t0"."owner_id", "t0"."related_id" FROM "owners_toys_toys_link" AS "t0" WHERE "t0"."owner_id" IN (?1) ORDER BY "t0"."related_id";"#
    );
}

#[tokio::test]
async fn removed_elements_are_unlinked_and_deleted() {
    let (db, _) = setup(models!(Country, Location, Animal, Toy, Owner)).await;

    assert_ok!(
        db.create::<Owner>()
            .run_with_error(Owner {
                name: "Ann".to_string(),
                toys: vec![toy("ball"), toy("rope")].into(),
                ..Default::default()
            })
            .await
    );

    let mut ann = load_ann(&db).await;
    ann.toys.get_mut().retain(|toy| toy.label != "ball");
    ann.toys.get_mut()[0].label = "long rope".to_string();
    assert_ok!(db.update::<Owner>().run_with_error(ann).await);

    let ann = load_ann(&db).await;
    assert_eq!(labels(&ann), ["long rope"]);

    let toys: Vec<_> = db
        .query::<Toy>()
        .run()
        .await
        .into_iter()
        .map(|toy| toy.label)
        .collect();
    assert_eq!(toys, ["long rope"]);
}

#[tokio::test]
async fn saved_elements_can_be_shared() {
    let (db, _) = setup(models!(Country, Location, Animal, Toy, Owner)).await;

    let ball = assert_ok!(db.create::<Toy>().run_with_error(toy("ball")).await);

    for name in ["Ann", "Bob"] {
        assert_ok!(
            db.create::<Owner>()
                .run_with_error(Owner {
                    name: name.to_string(),
                    toys: vec![ball.clone()].into(),
                    ..Default::default()
                })
                .await
        );
    }

    let mut query = db.query::<Owner>();
    query.include_generic(Path::<Owner, Many<Toy>>::new("toys"));
    let owners = assert_ok!(query.run_with_error().await);

    assert_eq!(owners.len(), 2);
    for owner in &owners {
        assert_eq!(owner.toys.get(), [ball.clone()]);
    }
}
