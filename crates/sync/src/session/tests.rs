use refbind_primitives::TypeTag;

use super::*;
use crate::memory::{MemoryField, MemoryStore, ScriptedPicker};
use crate::test_helpers::{RecordingNavigator, id, ty};

type TestSession = Session<MemoryField, MemoryStore, ScriptedPicker, RecordingNavigator>;

fn session(config: LookupConfig) -> TestSession {
	Session::new(
		config,
		MemoryField::new(""),
		MemoryStore::new(),
		ScriptedPicker::new(),
		RecordingNavigator::new(),
	)
}

fn pick(digit: char, entity_type: &str, name: &str) -> PickedRecord {
	PickedRecord {
		id: id(digit),
		entity_type: ty(entity_type),
		name: name.to_owned(),
	}
}

fn types(names: &[&str]) -> Vec<TypeTag> {
	names.iter().map(|n| ty(n)).collect()
}

#[tokio::test]
async fn pick_request_carries_config_and_exclusions() {
	let mut config = LookupConfig::new(types(&["contact", "account", "lead"])).multi(None);
	config.default_type = Some(ty("account"));
	config.disable_recents = true;
	let session = session(config);

	session
		.picker()
		.push_response(Ok(vec![pick('1', "contact", "Jane Doe"), pick('2', "account", "Contoso")]));
	session.open_lookup().await.unwrap();
	session.open_lookup().await;

	let requests = session.picker().requests();
	assert_eq!(requests.len(), 2);
	assert!(requests[0].exclude_filters.is_empty());

	let second = &requests[1];
	assert!(second.multi && second.disable_recents);
	assert_eq!(second.default_type, Some(ty("account")));
	assert_eq!(second.types.len(), 3);
	let filtered: Vec<_> = second.exclude_filters.iter().map(|f| f.entity_type.clone()).collect();
	assert_eq!(filtered, types(&["contact", "account"]));
	assert!(second.exclude_filters[0].excludes(&id('1')));
}

#[tokio::test]
async fn blank_pick_names_fall_back() {
	let session = session(LookupConfig::new(types(&["account"])));
	session.picker().push_response(Ok(vec![pick('2', "account", "  ")]));

	let output = session.open_lookup().await.unwrap();
	assert_eq!(output.display, UNNAMED_DISPLAY_NAME);
}

#[tokio::test]
async fn cancelled_picker_changes_nothing() {
	let session = session(LookupConfig::new(types(&["contact"])));
	let version = session.version();

	assert_eq!(session.open_lookup().await, None);
	assert_eq!(session.version(), version);
	assert_eq!(session.error(), None);
	assert!(session.field().published().is_empty());
}

#[tokio::test]
async fn failed_picker_sets_error() {
	let session = session(LookupConfig::new(types(&["contact"])));
	session.picker().push_response(Err(PickError::Failed("dialog crashed".into())));

	assert_eq!(session.open_lookup().await, None);
	assert_eq!(session.error().as_deref(), Some(PICK_ERROR_MESSAGE));
	assert!(session.selection().is_empty());

	session.picker().push_response(Ok(vec![pick('1', "contact", "Jane Doe")]));
	session.open_lookup().await.unwrap();
	assert_eq!(session.error(), None);
}

#[tokio::test]
async fn disabled_control_ignores_user_actions() {
	let mut config = LookupConfig::new(types(&["contact"]));
	config.disabled = true;
	let session = session(config);
	session.field().set(format!("{}:contact", id('1')));
	session.store().insert(&ty("contact"), &id('1'), "fullname", "Jane Doe");
	assert!(matches!(session.sync().await, SyncStatus::Committed(_)));

	assert_eq!(session.open_lookup().await, None);
	assert!(session.picker().requests().is_empty());
	assert_eq!(session.remove_record(&id('1')), None);
	assert_eq!(session.selection().len(), 1);
}

#[tokio::test]
async fn full_multi_select_skips_picker() {
	let session = session(LookupConfig::new(types(&["contact"])).multi(Some(1)));
	session.picker().push_response(Ok(vec![pick('1', "contact", "Jane Doe")]));
	session.open_lookup().await.unwrap();

	assert_eq!(session.open_lookup().await, None);
	assert_eq!(session.picker().requests().len(), 1);
	assert_eq!(session.error().as_deref(), Some("You can select at most 1 record."));
}

#[tokio::test]
async fn placeholder_comes_from_config() {
	let mut config = LookupConfig::new(types(&["contact"]));
	config.placeholder = "Pick a contact".into();
	assert_eq!(session(config).placeholder(), "Pick a contact");
}
