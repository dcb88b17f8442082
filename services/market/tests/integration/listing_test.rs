use chrono::{Duration, Utc};
use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;

use bazaar_market::domain::types::{ListingFilter, ListingSortBy};
use bazaar_market::error::MarketServiceError;
use bazaar_market::usecase::listing::{
    CreateListingInput, CreateListingUseCase, DeleteListingUseCase, GetListingUseCase,
    ListListingsUseCase, UpdateListingInput, UpdateListingUseCase,
};

use crate::helpers::{
    MockListingRepo, MockReviewRepo, active_user, caller_for, forbidden, moderator_user,
    test_listing, test_review,
};

fn catalog_of(listings: MockListingRepo) -> ListListingsUseCase<MockListingRepo, MockReviewRepo> {
    let handle = listings.listings_handle();
    ListListingsUseCase {
        listings,
        reviews: MockReviewRepo::new(vec![], handle),
    }
}

fn page(n: u64) -> PageRequest {
    PageRequest { page: n }
}

// ── Catalog paging and filters ───────────────────────────────────────────────

#[tokio::test]
async fn should_page_the_catalog_newest_first() {
    let owner = Uuid::now_v7();
    let listings = MockListingRepo::new(vec![
        test_listing(owner, "Oak table", 120, 60),
        test_listing(owner, "City bike", 250, 10),
        test_listing(owner, "Reading lamp", 35, 30),
        test_listing(owner, "Armchair", 80, 50),
        test_listing(owner, "Record player", 150, 20),
        test_listing(owner, "Bookshelf", 60, 40),
    ]);
    let catalog = catalog_of(listings);

    let first = catalog
        .execute(&ListingFilter::default(), ListingSortBy::default(), page(1))
        .await
        .unwrap();
    assert_eq!(first.len(), 4, "a full page holds four listings");
    let titles: Vec<&str> = first.iter().map(|r| r.listing.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["City bike", "Record player", "Reading lamp", "Bookshelf"],
        "default ordering is newest first"
    );

    let second = catalog
        .execute(&ListingFilter::default(), ListingSortBy::default(), page(2))
        .await
        .unwrap();
    let titles: Vec<&str> = second.iter().map(|r| r.listing.title.as_str()).collect();
    assert_eq!(titles, vec!["Armchair", "Oak table"]);

    let third = catalog
        .execute(&ListingFilter::default(), ListingSortBy::default(), page(3))
        .await
        .unwrap();
    assert!(third.is_empty(), "past the last page comes back empty");
}

#[tokio::test]
async fn should_treat_page_zero_as_the_first_page() {
    let owner = Uuid::now_v7();
    let listings = MockListingRepo::new(vec![test_listing(owner, "City bike", 250, 10)]);
    let catalog = catalog_of(listings);

    let rows = catalog
        .execute(&ListingFilter::default(), ListingSortBy::default(), page(0))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn should_order_oldest_first_when_asked() {
    let owner = Uuid::now_v7();
    let listings = MockListingRepo::new(vec![
        test_listing(owner, "City bike", 250, 10),
        test_listing(owner, "Oak table", 120, 60),
    ]);
    let catalog = catalog_of(listings);

    let rows = catalog
        .execute(
            &ListingFilter::default(),
            ListingSortBy::from_query("created_at").unwrap(),
            page(1),
        )
        .await
        .unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.listing.title.as_str()).collect();
    assert_eq!(titles, vec!["Oak table", "City bike"]);
}

#[tokio::test]
async fn should_match_title_exactly_but_case_insensitively() {
    let owner = Uuid::now_v7();
    let listings = MockListingRepo::new(vec![
        test_listing(owner, "City Bike", 250, 10),
        test_listing(owner, "City bike trailer", 90, 20),
    ]);
    let catalog = catalog_of(listings);

    let rows = catalog
        .execute(
            &ListingFilter {
                title: Some("city bike".to_owned()),
                ..Default::default()
            },
            ListingSortBy::default(),
            page(1),
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1, "title filter is exact, not substring");
    assert_eq!(rows[0].listing.title, "City Bike");
}

#[tokio::test]
async fn should_search_titles_by_substring() {
    let owner = Uuid::now_v7();
    let listings = MockListingRepo::new(vec![
        test_listing(owner, "City Bike", 250, 10),
        test_listing(owner, "City bike trailer", 90, 20),
        test_listing(owner, "Oak table", 120, 30),
    ]);
    let catalog = catalog_of(listings);

    let rows = catalog
        .execute(
            &ListingFilter {
                search: Some("BIKE".to_owned()),
                ..Default::default()
            },
            ListingSortBy::default(),
            page(1),
        )
        .await
        .unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.listing.title.as_str()).collect();
    assert_eq!(titles, vec!["City Bike", "City bike trailer"]);
}

#[tokio::test]
async fn should_combine_owner_and_day_filters() {
    let seller = Uuid::now_v7();
    let other = Uuid::now_v7();
    let three_days = 3 * 24 * 60;
    let listings = MockListingRepo::new(vec![
        test_listing(seller, "City bike", 250, three_days),
        test_listing(seller, "Oak table", 120, 0),
        test_listing(other, "Armchair", 80, three_days),
    ]);
    let catalog = catalog_of(listings);

    let day = (Utc::now() - Duration::minutes(three_days)).date_naive();
    let rows = catalog
        .execute(
            &ListingFilter {
                owner_id: Some(seller),
                created_on: Some(day),
                ..Default::default()
            },
            ListingSortBy::default(),
            page(1),
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].listing.title, "City bike");
}

// ── Review averages ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_recompute_the_average_on_every_read() {
    let listing = test_listing(Uuid::now_v7(), "City bike", 250, 10);
    let listing_id = listing.id;
    let rater = Uuid::now_v7();

    let listings = MockListingRepo::new(vec![listing]);
    let reviews = MockReviewRepo::new(
        vec![
            test_review(Some(rater), listing_id, 5),
            test_review(Some(rater), listing_id, 4),
        ],
        listings.listings_handle(),
    );
    let reviews_handle = reviews.reviews_handle();
    let catalog = ListListingsUseCase { listings, reviews };

    let rows = catalog
        .execute(&ListingFilter::default(), ListingSortBy::default(), page(1))
        .await
        .unwrap();
    assert_eq!(rows[0].average_rating, 4.5);

    // A new low rating shows up on the very next read.
    reviews_handle
        .lock()
        .unwrap()
        .push(test_review(Some(rater), listing_id, 1));

    let rows = catalog
        .execute(&ListingFilter::default(), ListingSortBy::default(), page(1))
        .await
        .unwrap();
    assert_eq!(rows[0].average_rating, 3.33);
}

#[tokio::test]
async fn should_return_detail_with_reviews_newest_first() {
    let reader = active_user("reader@example.com");
    let listing = test_listing(Uuid::now_v7(), "City bike", 250, 10);
    let listing_id = listing.id;
    let rater = Uuid::now_v7();

    let mut older = test_review(Some(rater), listing_id, 5);
    older.created_at = Utc::now() - Duration::minutes(30);
    let mut newer = test_review(Some(rater), listing_id, 4);
    newer.created_at = Utc::now() - Duration::minutes(5);
    let (older_id, newer_id) = (older.id, newer.id);

    let listings = MockListingRepo::new(vec![listing]);
    let reviews = MockReviewRepo::new(vec![older, newer], listings.listings_handle());
    let usecase = GetListingUseCase { listings, reviews };

    let detail = usecase.execute(caller_for(&reader), listing_id).await.unwrap();
    assert_eq!(detail.listing.average_rating, 4.5);
    let ids: Vec<Uuid> = detail.reviews.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newer_id, older_id]);
}

// ── Lifecycle through a shared store ─────────────────────────────────────────

#[tokio::test]
async fn should_create_update_and_delete_through_the_same_store() {
    let seller = active_user("seller@example.com");
    let stranger = active_user("stranger@example.com");
    let moderator = moderator_user("mod@example.com");

    let listings = MockListingRepo::empty();
    let handle = listings.listings_handle();

    let created = CreateListingUseCase {
        listings: listings.clone(),
        forbidden_words: forbidden(),
    }
    .execute(
        caller_for(&seller),
        CreateListingInput {
            title: "City bike".to_owned(),
            price: 250,
            description: Some("Three gears".to_owned()),
            image_url: None,
        },
    )
    .await
    .unwrap();
    let listing_id = created.listing.id;
    assert_eq!(created.listing.owner_id, seller.id);
    assert_eq!(handle.lock().unwrap().len(), 1);

    // The owner reprices it.
    let update = UpdateListingUseCase {
        listings: listings.clone(),
        reviews: MockReviewRepo::new(vec![], listings.listings_handle()),
        forbidden_words: forbidden(),
    };
    let updated = update
        .execute(
            caller_for(&seller),
            listing_id,
            UpdateListingInput {
                price: Some(199),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.listing.price, 199);
    assert_eq!(handle.lock().unwrap()[0].price, 199);

    // A stranger cannot remove it; the row stays.
    let delete = DeleteListingUseCase {
        listings: listings.clone(),
    };
    let result = delete.execute(caller_for(&stranger), listing_id).await;
    assert!(
        matches!(result, Err(MarketServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
    assert_eq!(handle.lock().unwrap().len(), 1);

    // A moderator can.
    delete
        .execute(caller_for(&moderator), listing_id)
        .await
        .unwrap();
    assert!(handle.lock().unwrap().is_empty());
}
