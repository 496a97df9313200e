use chrono::NaiveDate;
use cocktail_log_core::db::open_db_in_memory;
use cocktail_log_core::{
    RepoError, ReviewDraft, ReviewListQuery, ReviewRepository, ReviewService, ReviewSort,
    SqliteReviewRepository, ValidationReason,
};
use serde_json::json;

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 20).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn create_then_list_returns_the_created_review() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, fixed_today);

    let mut draft = ReviewDraft::new("Pago Pago Punch", 8.0);
    draft.notes = "Good!".to_string();
    draft.date_made = Some(day(2022, 8, 11));
    let created = service.create(&draft).unwrap();

    assert_eq!(created.date_created, fixed_today());
    assert_eq!(created.date_made, day(2022, 8, 11));

    let listed = service
        .list(&ReviewListQuery::new("", ReviewSort::DateAdded))
        .unwrap();
    assert_eq!(listed, vec![created]);
}

#[test]
fn create_rejects_off_grid_and_below_range_ratings() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, fixed_today);

    for rating in [10.25, 0.5] {
        let draft = ReviewDraft::new("Ancient Mariner", rating);
        match service.create(&draft) {
            Err(RepoError::Validation(err)) => assert_eq!(err.field, "rating"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(draft.rating, rating);
    }

    let blank = service.create(&ReviewDraft::new("  ", 7.0)).unwrap_err();
    assert!(matches!(
        blank,
        RepoError::Validation(ref err) if err.field == "recipeName" && err.reason == ValidationReason::Empty
    ));
    assert_eq!(service.count().unwrap(), 0);
}

#[test]
fn delete_missing_id_returns_false_and_keeps_size() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, fixed_today);

    let kept = service.create(&ReviewDraft::new("Zombie", 9.0)).unwrap();
    assert!(!service.delete("no-such-review").unwrap());
    assert_eq!(service.count().unwrap(), 1);

    assert!(service.delete(&kept.id).unwrap());
    assert!(!service.delete(&kept.id).unwrap());
    assert_eq!(service.count().unwrap(), 0);
}

#[test]
fn clear_all_returns_prior_count_and_empties_list() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, fixed_today);

    service.create(&ReviewDraft::new("Mai Tai", 9.5)).unwrap();
    service.create(&ReviewDraft::new("Daiquiri", 8.0)).unwrap();
    service.create(&ReviewDraft::new("Hurricane", 4.0)).unwrap();

    assert_eq!(service.clear_all().unwrap(), 3);
    assert!(service.list(&ReviewListQuery::default()).unwrap().is_empty());
    assert_eq!(service.clear_all().unwrap(), 0);
}

#[test]
fn list_filters_case_insensitively_across_text_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, fixed_today);

    let mut by_venue = ReviewDraft::new("Jungle Bird", 8.0);
    by_venue.venue = "Smuggler's COVE".to_string();
    let by_venue = service.create(&by_venue).unwrap();

    let mut by_notes = ReviewDraft::new("Ancient Mariner", 5.0);
    by_notes.notes = "Total Tiki recipe.".to_string();
    let by_notes = service.create(&by_notes).unwrap();

    let mut by_occasion = ReviewDraft::new("Négroni", 7.5);
    by_occasion.occasion = "Birthday".to_string();
    by_occasion.modifications = "cove-style garnish".to_string();
    let by_occasion = service.create(&by_occasion).unwrap();

    let cove = service
        .list(&ReviewListQuery::new("cove", ReviewSort::Name))
        .unwrap();
    assert_eq!(cove, vec![by_venue.clone()]);

    let tiki = service
        .list(&ReviewListQuery::new("TIKI", ReviewSort::Name))
        .unwrap();
    assert_eq!(tiki, vec![by_notes]);

    let accented = service
        .list(&ReviewListQuery::new("NÉGR", ReviewSort::Name))
        .unwrap();
    assert_eq!(accented, vec![by_occasion]);

    assert_eq!(
        service
            .list(&ReviewListQuery::new("", ReviewSort::Name))
            .unwrap()
            .len(),
        3
    );
}

#[test]
fn list_query_whitespace_is_part_of_the_needle() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, fixed_today);

    let mai_tai = service.create(&ReviewDraft::new("Mai Tai", 9.5)).unwrap();
    let mut tail = ReviewDraft::new("Cocktail of the Day", 6.0);
    tail.venue = "Tailwind Bar".to_string();
    service.create(&tail).unwrap();

    let spaced = service
        .list(&ReviewListQuery::new(" tai", ReviewSort::Name))
        .unwrap();
    assert_eq!(spaced, vec![mai_tai]);

    let blank = service
        .list(&ReviewListQuery::new("  ", ReviewSort::Name))
        .unwrap();
    assert!(blank.is_empty());
}

#[test]
fn list_sort_orders_with_id_tiebreak() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, fixed_today);

    let id_a = "00000000-0000-4000-8000-000000000001";
    let id_b = "00000000-0000-4000-8000-000000000002";
    let id_c = "00000000-0000-4000-8000-000000000003";
    let report = service
        .bulk_import(&[
            json!({ "id": id_c, "recipeName": "zombie", "rating": 8.0,
                    "dateMade": "2022-08-06", "dateCreated": "2025-10-01" }),
            json!({ "id": id_b, "recipeName": "Ancient Mariner", "rating": 8.0,
                    "dateMade": "2022-08-07", "dateCreated": "2025-10-20" }),
            json!({ "id": id_a, "recipeName": "Mai Tai", "rating": 9.5,
                    "dateMade": "2022-08-07", "dateCreated": "2025-10-20" }),
        ])
        .unwrap();
    assert_eq!(report.imported, 3);

    let ids = |sort: ReviewSort| -> Vec<String> {
        service
            .list(&ReviewListQuery::new("", sort))
            .unwrap()
            .into_iter()
            .map(|review| review.id.to_string())
            .collect()
    };

    assert_eq!(ids(ReviewSort::DateAdded), vec![id_a, id_b, id_c]);
    assert_eq!(ids(ReviewSort::DateMade), vec![id_a, id_b, id_c]);
    assert_eq!(ids(ReviewSort::Rating), vec![id_a, id_b, id_c]);
    assert_eq!(ids(ReviewSort::Name), vec![id_b, id_a, id_c]);
}

#[test]
fn list_snapshot_survives_later_mutation() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let mut service = ReviewService::with_clock(repo, fixed_today);

    let created = service.create(&ReviewDraft::new("Navy Grog", 6.5)).unwrap();
    let snapshot = service.list(&ReviewListQuery::default()).unwrap();
    service.clear_all().unwrap();

    assert_eq!(snapshot, vec![created]);
}

#[test]
fn repository_rejects_invalid_persisted_rows() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO reviews (id, recipe_name, rating, date_made, date_created)
         VALUES ('00000000-0000-4000-8000-00000000000a', 'Bad', 12.0, '2025-01-01', '2025-01-01');",
        [],
    )
    .unwrap();

    let repo = SqliteReviewRepository::try_new(&mut conn).unwrap();
    let err = repo.list_reviews(&ReviewListQuery::default()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
