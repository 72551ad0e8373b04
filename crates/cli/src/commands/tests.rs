use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use super::*;

const JANE: &str = "11111111-1111-1111-1111-111111111111";
const CONTOSO: &str = "22222222-2222-2222-2222-222222222222";
const GONE: &str = "33333333-3333-3333-3333-333333333333";

fn fixture() -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	write!(
		file,
		r#"{{
			"contact": {{ "{JANE}": {{ "fullname": "Jane Doe" }} }},
			"account": {{ "{CONTOSO}": {{ "name": "Contoso" }} }}
		}}"#
	)
	.unwrap();
	file
}

fn args(records: &NamedTempFile, config: Option<PathBuf>, value: String) -> SessionArgs {
	SessionArgs {
		records: records.path().to_path_buf(),
		config,
		value,
	}
}

fn pick(id: &str, entity_type: &str) -> ParsedRef {
	parse(&format!("{id}:{entity_type}")).remove(0)
}

#[test]
fn filter_lists_bound_ids_of_one_type() {
	let value = format!("{JANE}:contact;{CONTOSO}:account");
	let contact = TypeTag::parse("contact").unwrap();
	let xml = filter_xml(&contact, &value).unwrap();
	assert!(xml.contains(&format!("<value>{JANE}</value>")));
	assert!(!xml.contains(CONTOSO));
	assert_eq!(filter_xml(&TypeTag::parse("lead").unwrap(), &value), None);
	assert_eq!(parse_refs(&value).len(), 2);
}

#[tokio::test]
async fn resolve_drops_missing_records() {
	let records = fixture();
	let report = resolve(&args(&records, None, format!("{JANE}:contact;{GONE}:account")))
		.await
		.unwrap();
	assert_eq!(report.sync, "committed");
	assert_eq!(report.value, format!("{JANE}:contact"));
	assert_eq!(report.display, "Jane Doe");
	assert_eq!(report.error, None);
}

#[tokio::test]
async fn add_appends_picks_with_fixture_names() {
	let records = fixture();
	let report = add(
		&args(&records, None, format!("{JANE}:contact")),
		&[pick(CONTOSO, "account"), pick(GONE, "account")],
	)
	.await
	.unwrap();
	assert_eq!(report.value, format!("{JANE}:contact;{CONTOSO}:account"));
	assert_eq!(report.display, "Jane Doe;Contoso");
	assert_eq!(report.count, 2);
}

#[tokio::test]
async fn add_respects_config() {
	let records = fixture();
	let mut config = NamedTempFile::new().unwrap();
	writeln!(config, "entity_types = [\"contact\", \"account\"]").unwrap();

	let report = add(
		&args(&records, Some(config.path().to_path_buf()), format!("{JANE}:contact")),
		&[pick(CONTOSO, "account")],
	)
	.await
	.unwrap();
	assert_eq!(report.value, format!("{CONTOSO}:account"));
	assert_eq!(report.entries.len(), 1);
}

#[tokio::test]
async fn remove_rewrites_value() {
	let records = fixture();
	let report = remove(&args(&records, None, format!("{JANE}:contact;{CONTOSO}:account")), JANE)
		.await
		.unwrap();
	assert_eq!(report.value, format!("{CONTOSO}:account"));
	assert!(remove(&args(&records, None, String::new()), "nope").await.is_err());
}

#[tokio::test]
async fn missing_fixture_is_an_error() {
	let dir = tempfile::tempdir().unwrap();
	let args = SessionArgs {
		records: dir.path().join("none.json"),
		config: None,
		value: String::new(),
	};
	let err = resolve(&args).await.unwrap_err();
	assert!(format!("{err:#}").contains("failed to load record fixture"));
}
