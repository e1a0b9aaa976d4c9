use leptos::mount::mount_to_body;
use lineage_explorer::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
