use cairn::Ref;
use tests::{assert_err, assert_ok, models, models::*, setup};

#[tokio::test]
async fn delete_blocked_until_the_link_is_removed() {
    let (db, log) = setup(models!(Country, Location, Animal, Toy, Owner)).await;

    let rex = assert_ok!(
        db.create::<Animal>()
            .run_with_error(Animal {
                name: "Rex".to_string(),
                ..Default::default()
            })
            .await
    );

    let mut ann = assert_ok!(
        db.create::<Owner>()
            .run_with_error(Owner {
                name: "Ann".to_string(),
                pet: Ref::Id(rex.id.unwrap()),
                ..Default::default()
            })
            .await
    );

    let mut delete = db.delete::<Animal>();
    delete.item(&rex);

    log.clear();
    let err = assert_err!(delete.run_with_error().await);
    assert!(err.is_link_constraint());
    assert_eq!(
        err.to_string(),
        "cannot delete `animals` row 1: still referenced by `owners`.`pet_id`"
    );
    assert_eq!(log.statements().last().map(String::as_str), Some("ROLLBACK"));

    assert!(db.exist::<Animal>().run().await);
    assert!(!delete.run().await);

    // Drop the reference; the same builder now succeeds
    ann.pet = Ref::Unset;
    assert_ok!(db.update::<Owner>().run_with_error(ann).await);

    assert_eq!(assert_ok!(delete.run_with_error().await), 1);
    assert!(!db.exist::<Animal>().run().await);
}

#[tokio::test]
async fn deleting_the_referrer_first_unblocks() {
    let (db, _) = setup(models!(Country, Location, Animal, Toy, Owner)).await;

    let rex = assert_ok!(
        db.create::<Animal>()
            .run_with_error(Animal {
                name: "Rex".to_string(),
                ..Default::default()
            })
            .await
    );
    let ann = assert_ok!(
        db.create::<Owner>()
            .run_with_error(Owner {
                name: "Ann".to_string(),
                pet: Ref::Id(rex.id.unwrap()),
                ..Default::default()
            })
            .await
    );

    let mut delete_rex = db.delete::<Animal>();
    delete_rex.item(&rex);
    assert!(assert_err!(delete_rex.run_with_error().await).is_link_constraint());

    let mut delete_ann = db.delete::<Owner>();
    delete_ann.item(&ann);
    assert_eq!(assert_ok!(delete_ann.run_with_error().await), 1);

    assert_eq!(assert_ok!(delete_rex.run_with_error().await), 1);
}

#[tokio::test]
async fn collection_links_block_deleting_elements() {
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
    let ball = ann.toys.get()[0].clone();

    let mut delete = db.delete::<Toy>();
    delete.item(&ball);

    let err = assert_err!(delete.run_with_error().await);
    assert!(err.is_link_constraint());
    assert!(err.to_string().contains("`owners_toys_toys_link`.`related_id`"));

    // Deleting the owner removes its links and, with auto_crud, its toys
    let mut delete_ann = db.delete::<Owner>();
    delete_ann.item(&ann);
    assert_ok!(delete_ann.run_with_error().await);

    assert!(!db.exist::<Toy>().run().await);
}
