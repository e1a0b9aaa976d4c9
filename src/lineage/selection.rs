//! Node selection held by one lineage view.

/// Single-node selection held by one lineage view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	/// Nothing selected.
	#[default]
	NoSelection,
	/// The model with this id.
	Selected(String),
}

/// Input that can change a [`Selection`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
	/// A node was clicked.
	NodeClicked(String),
	/// Empty canvas was clicked.
	BackgroundClicked,
	/// The detail panel was closed.
	Dismissed,
}

impl Selection {
	/// Next state after `event`. Clicking the selected node deselects it.
	pub fn apply(&self, event: SelectionEvent) -> Selection {
		match (self, event) {
			(Selection::Selected(current), SelectionEvent::NodeClicked(id)) if *current == id => {
				Selection::NoSelection
			}
			(_, SelectionEvent::NodeClicked(id)) => Selection::Selected(id),
			(_, SelectionEvent::BackgroundClicked | SelectionEvent::Dismissed) => {
				Selection::NoSelection
			}
		}
	}

	/// Id of the selected model.
	pub fn selected(&self) -> Option<&str> {
		match self {
			Selection::Selected(id) => Some(id),
			Selection::NoSelection => None,
		}
	}

	/// Whether `id` is the selected model.
	pub fn is_selected(&self, id: &str) -> bool {
		self.selected() == Some(id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn click(id: &str) -> SelectionEvent {
		SelectionEvent::NodeClicked(id.into())
	}

	#[test]
	fn click_selects_and_reclick_deselects() {
		let start = Selection::default();
		assert_eq!(start, Selection::NoSelection);

		let selected = start.apply(click("x"));
		assert_eq!(selected, Selection::Selected("x".into()));
		assert_eq!(selected.apply(click("x")), Selection::NoSelection);
	}

	#[test]
	fn clicking_another_node_moves_the_selection() {
		let selected = Selection::Selected("x".into());
		assert_eq!(selected.apply(click("y")), Selection::Selected("y".into()));
	}

	#[test]
	fn background_always_clears() {
		for state in [Selection::NoSelection, Selection::Selected("x".into())] {
			assert_eq!(state.apply(SelectionEvent::BackgroundClicked), Selection::NoSelection);
			assert_eq!(state.apply(SelectionEvent::Dismissed), Selection::NoSelection);
		}
	}

	#[test]
	fn queries() {
		let selected = Selection::Selected("x".into());
		assert_eq!(selected.selected(), Some("x"));
		assert!(selected.is_selected("x"));
		assert!(!Selection::NoSelection.is_selected("x"));
	}
}
