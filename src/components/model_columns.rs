use leptos::prelude::*;

use crate::lineage::Column;

/// Column table of one model.
#[component]
pub fn ModelColumns(columns: Vec<Column>) -> impl IntoView {
	if columns.is_empty() {
		return view! { <p class="muted">"No columns defined for this model."</p> }.into_any();
	}

	let rows = columns
		.into_iter()
		.map(|col| {
			let tests = if col.tests.is_empty() {
				view! { <span class="muted">"--"</span> }.into_any()
			} else {
				col.tests
					.into_iter()
					.map(|test| view! { <span class="badge badge--test">{test}</span> })
					.collect_view()
					.into_any()
			};
			view! {
				<tr>
					<td class="mono strong">{col.name}</td>
					<td class="mono muted">{col.data_type}</td>
					<td class="muted">{col.description}</td>
					<td>{tests}</td>
				</tr>
			}
		})
		.collect_view();

	view! {
		<table class="data-table">
			<thead>
				<tr>
					<th>"Column"</th>
					<th>"Type"</th>
					<th>"Description"</th>
					<th>"Tests"</th>
				</tr>
			</thead>
			<tbody>{rows}</tbody>
		</table>
	}
	.into_any()
}
