//! An href built for a mutation always equals the path the write navigates to.

use std::sync::Arc;

use proptest::prelude::*;
use vitrine_codec::{FieldMap, encode};
use vitrine_urls::{LinkBuilder, MemoryHistory, Navigator, PathQuery, TransitionOptions};

const PALETTE: [&str; 4] = ["blue", "yellow", "indigo", "orange"];

fn colors() -> impl Strategy<Value = Vec<String>> {
	prop::sample::subsequence(PALETTE.to_vec(), 0..=PALETTE.len())
		.prop_map(|values| values.into_iter().map(str::to_string).collect())
		.prop_shuffle()
}

fn state() -> impl Strategy<Value = FieldMap> {
	(
		prop::option::of(1_i64..20),
		prop::option::of(prop::sample::select(vec!["new", "priceLow", "priceHigh"])),
		colors(),
	)
		.prop_map(|(page, sort, colors)| {
			let mut map = FieldMap::new();
			if let Some(page) = page {
				map.insert("page", page.to_string());
			}
			if let Some(sort) = sort {
				map.insert("sort", sort);
			}
			map.insert("color", colors);
			map
		})
}

fn path_for(map: &FieldMap) -> String {
	let segment = encode(map);
	if segment.is_empty() {
		"/products/shoes".to_string()
	} else {
		format!("/products/shoes/{segment}")
	}
}

fn remove_keys() -> impl Strategy<Value = Vec<String>> {
	prop::sample::subsequence(vec!["page", "sort", "color"], 0..=3)
		.prop_map(|keys| keys.into_iter().map(str::to_string).collect())
}

proptest! {
	/// Page links match page writes.
	#[test]
	fn prop_page_link_matches_write(initial in state(), page in -3_i64..30, remove in remove_keys()) {
		let history = Arc::new(MemoryHistory::new("/products/{params:*}", path_for(&initial)));
		let binding = PathQuery::new(history.clone(), "page", 1_i64);
		let href = LinkBuilder::new(history.clone()).link("page", &page, &remove).unwrap();

		let options = TransitionOptions { remove_keys: remove, ..Default::default() };
		tokio_test::block_on(binding.write(page, &options)).unwrap();

		prop_assert_eq!(history.current_path(), href);
	}

	/// Colour links match colour writes, including the empty selection.
	#[test]
	fn prop_color_link_matches_write(initial in state(), next in colors(), remove in remove_keys()) {
		let history = Arc::new(MemoryHistory::new("/products/{params:*}", path_for(&initial)));
		let binding = PathQuery::new(history.clone(), "color", Vec::<String>::new());
		let href = binding.link(&next, &remove).unwrap();

		let options = TransitionOptions { remove_keys: remove, ..Default::default() };
		tokio_test::block_on(binding.write(next, &options)).unwrap();

		prop_assert_eq!(history.current_path(), href);
	}

	/// The written path decodes back to the value that was written.
	#[test]
	fn prop_write_then_read(initial in state(), next in colors()) {
		let history = Arc::new(MemoryHistory::new("/products/{params:*}", path_for(&initial)));
		let binding = PathQuery::new(history.clone(), "color", Vec::<String>::new());

		tokio_test::block_on(binding.write(next.clone(), &TransitionOptions::default())).unwrap();

		let mut expected = next;
		expected.sort();
		prop_assert_eq!(binding.sync(), expected);
	}
}
