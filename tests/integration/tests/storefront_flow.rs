//! A visitor browsing a listing: every href rendered on the page leads to a
//! path that the server derives the same listing from.

use std::sync::Arc;

use rstest::rstest;
use vitrine::prelude::*;
use vitrine_integration_tests::{listing, settings};

#[rstest]
#[tokio::test]
async fn test_browsing_session(settings: StorefrontSettings) {
	// Arrange
	let history = Arc::new(MemoryHistory::new(
		settings.route_template.clone(),
		"/products/shoes",
	));
	let page = PathQuery::new(history.clone(), settings.keys.page.clone(), 1_i64);
	let sort = PathQuery::new(history.clone(), settings.keys.sort.clone(), "new".to_string());
	let colors = PathQuery::new(history.clone(), settings.keys.color.clone(), Vec::<String>::new());
	let links = LinkBuilder::new(history.clone());
	let filter = ColorFilter::new(settings.palette.clone()).removing(settings.keys.page.clone());

	// Act: sort, filter, then page forward
	sort.write(
		ProductSort::PriceHigh.token().to_string(),
		&TransitionOptions::default(),
	)
	.await
	.unwrap();
	filter
		.toggle(&colors, "yellow", TransitionOptions::new().scroll(false))
		.await
		.unwrap();
	page.sync();
	let pagination = PaginationLinks::build(&page, &links, settings.page_count).unwrap();
	page.write(2, &TransitionOptions::default()).await.unwrap();

	// Assert
	assert_eq!(pagination.next.href, history.current_path());
	let derived = listing(&settings, &history.current_path());
	assert_eq!(derived.category, "shoes");
	assert_eq!(derived.pagination.page, 2);
	assert_eq!(derived.sort, vec!["sortByPrice:desc"]);
	assert_eq!(derived.colors, vec!["yellow"]);
}

#[rstest]
fn test_filter_chips_lead_to_first_page(settings: StorefrontSettings) {
	let history = Arc::new(MemoryHistory::new(
		settings.route_template.clone(),
		"/products/hats/color=blue;page=3",
	));
	let colors = PathQuery::new(history.clone(), settings.keys.color.clone(), Vec::<String>::new());
	let filter = ColorFilter::new(settings.palette.clone()).removing(settings.keys.page.clone());

	let chips = filter.chips(&colors, &LinkBuilder::new(history)).unwrap();

	for chip in chips {
		let derived = listing(&settings, &chip.href);
		assert_eq!(derived.pagination.page, 1, "{}", chip.href);
		assert_eq!(derived.colors.contains(&chip.value), !chip.selected);
	}
}

#[rstest]
fn test_segment_round_trip_through_facade() {
	let map: FieldMap = [("sort", FieldValue::from("new")), ("color", vec!["orange", "blue"].into())]
		.into_iter()
		.collect();

	let segment = encode(&map);

	assert_eq!(segment, "color=blue_orange;sort=new");
	assert_eq!(decode(Some(&segment)), map.canonical());
}
