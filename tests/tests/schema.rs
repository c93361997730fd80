use cairn::{
    schema::MemberKind,
    stmt::Path,
    Many,
};
use tests::{assert_err, assert_ok, models, models::*, setup, try_setup};

fn junction_of<'a>(db: &'a cairn::Db, member: &str) -> &'a str {
    let info = assert_ok!(db.get_table_info::<Owner>());
    match &info.member(member).expect("member is declared").kind {
        MemberKind::Collection { junction, .. } => &junction.name,
        kind => panic!("expected a collection; actual={kind:?}"),
    }
}

#[tokio::test]
async fn default_names() {
    let (db, _) = setup(models!(Country, Location, Animal, Toy, Owner)).await;

    assert_eq!(assert_ok!(db.get_table_info::<Location>()).name, "locations");
    assert_eq!(assert_ok!(db.get_table_info::<Country>()).name, "countries");
    assert_eq!(junction_of(&db, "toys"), "owners_toys_toys_link");
}

#[tokio::test]
async fn long_junction_names_are_hashed() {
    let mut builder = models!(Country, Location, Animal, Toy, Owner);
    builder.max_identifier_length(20);

    let (db, _) = setup(builder).await;

    let name = junction_of(&db, "toys").to_string();
    assert_eq!(name.len(), 32);
    assert!(name.starts_with("lnk_"));

    assert_ok!(
        db.create::<Owner>()
            .run_with_error(Owner {
                name: "Ann".to_string(),
                toys: vec![toy("ball")].into(),
                ..Default::default()
            })
            .await
    );

    let mut query = db.query::<Owner>();
    query.include_generic(Path::<Owner, Many<Toy>>::new("toys"));
    let ann = assert_ok!(query.first().await).expect("owner was stored");
    assert_eq!(ann.toys.len(), 1);
}

#[tokio::test]
async fn prefixed_tables() {
    let mut builder = models!(Country, Location, Animal, Toy, Owner);
    builder.table_name_prefix("app_");

    let (db, log) = setup(builder).await;

    assert_eq!(assert_ok!(db.get_table_info::<Country>()).name, "app_countries");
    assert_eq!(junction_of(&db, "toys"), "app_owners_app_toys_toys_link");

    log.clear();
    assert_ok!(db.create::<Country>().run_with_error(france()).await);
    assert!(log.statements().iter().any(|sql| sql.contains(r#""app_countries""#)));
}

#[tokio::test]
async fn unregistered_targets_are_rejected() {
    let Err(err) = try_setup(models!(Location, Animal)).await else {
        panic!("expected the schema to be rejected");
    };

    assert!(err.is_invalid_schema());
    assert_eq!(
        err.to_string(),
        "invalid schema: `Location` member `country` refers to `Country`, which is not registered"
    );
}

#[tokio::test]
async fn unregistered_entities_are_reported_by_builders() {
    let (db, log) = setup(models!(Country)).await;

    let err = assert_err!(db.query::<Toy>().run_with_error().await);
    assert!(err.is_invalid_schema());
    assert_eq!(err.to_string(), "invalid schema: `Toy` is not registered");

    assert!(db.query::<Toy>().run().await.is_empty());
    assert!(!db.delete::<Toy>().run().await);
    assert!(assert_err!(db.get_table_info::<Toy>()).is_invalid_schema());
    assert!(log.is_empty());
}

#[tokio::test]
async fn connect_by_url() {
    let mut builder = models!(Country);
    let db = assert_ok!(builder.connect("sqlite::memory:").await);
    assert_ok!(db.push_schema().await);

    assert_ok!(db.create::<Country>().run_with_error(france()).await);
    assert!(db.exist::<Country>().run().await);

    let err = assert_err!(models!(Country).connect("postgres://localhost/app").await);
    assert_eq!(
        err.to_string(),
        "unsupported database; scheme=postgres; url=postgres://localhost/app"
    );
}
