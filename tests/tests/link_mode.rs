use cairn::{stmt::Path, LinkMode, Ref};
use tests::{assert_ok, models, models::*, setup};

async fn paris(db: &cairn::Db) -> (Country, Location) {
    let fr = assert_ok!(db.create::<Country>().run_with_error(france()).await);
    let paris = assert_ok!(
        db.create::<Location>()
            .run_with_error(Location {
                city: "Paris".to_string(),
                country: Ref::Id(fr.id.unwrap()),
                ..Default::default()
            })
            .await
    );
    (fr, paris)
}

#[tokio::test]
async fn references_are_short_links_by_default() {
    let (db, log) = setup(models!(Country, Location)).await;
    let (fr, _) = paris(&db).await;
    log.clear();

    let location = assert_ok!(db.query::<Location>().first().await).expect("location was stored");
    assert_eq!(location.country, Ref::Id(fr.id.unwrap()));
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn full_links_load_one_level() {
    let (db, _) = setup(models!(Country, Location, Animal)).await;
    let (fr, paris) = paris(&db).await;

    assert_ok!(
        db.create::<Animal>()
            .run_with_error(Animal {
                name: "Rex".to_string(),
                location: Ref::Id(paris.id.unwrap()),
                ..Default::default()
            })
            .await
    );

    let mut query = db.query::<Location>();
    query.short_link(false);
    let location = assert_ok!(query.first().await).expect("location was stored");
    assert_eq!(location.country.get(), Some(&fr));

    let mut query = db.query::<Animal>();
    query.short_link(false);
    let rex = assert_ok!(query.first().await).expect("animal was stored");
    let location = rex.location.get().expect("location is loaded");
    assert_eq!(location.city, "Paris");
    assert_eq!(location.country, Ref::Id(fr.id.unwrap()));
}

#[tokio::test]
async fn handle_default_applies_to_every_builder() {
    let mut builder = models!(Country, Location);
    builder.link_mode(LinkMode::Full);

    let (db, _) = setup(builder).await;
    let (fr, _) = paris(&db).await;

    let location = assert_ok!(db.query::<Location>().first().await).expect("location was stored");
    assert_eq!(location.country.get(), Some(&fr));

    let mut query = db.query::<Location>();
    query.short_link(true);
    let location = assert_ok!(query.first().await).expect("location was stored");
    assert_eq!(location.country, Ref::Id(fr.id.unwrap()));
}

#[tokio::test]
async fn nested_includes_follow_the_path() {
    let (db, _) = setup(models!(Country, Location, Animal)).await;
    let (fr, paris) = paris(&db).await;

    assert_ok!(
        db.create::<Animal>()
            .run_with_error(Animal {
                name: "Rex".to_string(),
                location: Ref::Id(paris.id.unwrap()),
                ..Default::default()
            })
            .await
    );

    let mut query = db.query::<Animal>();
    query.include_generic(
        Path::<Animal, Ref<Location>>::new("location").to::<Ref<Country>>("country"),
    );

    let rex = assert_ok!(query.first().await).expect("animal was stored");
    let location = rex.location.get().expect("location is loaded");
    assert_eq!(location.country.get(), Some(&fr));
}
