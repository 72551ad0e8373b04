use std::io::Write;

use super::*;
use crate::test_helpers::ty;

#[test]
fn minimal_config_uses_defaults() {
	let config = LookupConfig::from_toml_str(r#"entity_types = ["contact"]"#).unwrap();
	assert_eq!(config, LookupConfig::new([ty("contact")]));
	assert!(config.linking_enabled);
	assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
	assert_eq!(config.effective_max(), Some(1));
}

#[test]
fn full_config_decodes() {
	let config = LookupConfig::from_toml_str(
		r#"
		entity_types = ["Contact", "account"]
		multi_select = true
		linking_enabled = false
		placeholder = "Pick someone"
		max_selection = 3
		default_type = "contact"
		disable_recents = true
		open_modal = true

		[display_fields]
		account = "accountnumber"
		"#,
	)
	.unwrap();

	assert_eq!(config.entity_types, vec![ty("contact"), ty("account")]);
	assert_eq!(config.effective_max(), Some(3));
	assert_eq!(config.default_type, Some(ty("contact")));
	assert_eq!(config.display_fields.get(&ty("account")).map(String::as_str), Some("accountnumber"));
	assert!(config.open_modal && config.disable_recents && !config.linking_enabled);
}

#[test]
fn unbounded_multi_select() {
	let config = LookupConfig::new([ty("contact")]).multi(None);
	assert_eq!(config.effective_max(), None);
}

#[test]
fn rejects_invalid_values() {
	let cases = [
		"entity_types = []",
		r#"entity_types = ["contact", "CONTACT"]"#,
		"entity_types = [\"contact\"]\nmax_selection = 0",
		"entity_types = [\"contact\"]\ndefault_type = \"account\"",
		"entity_types = [\"contact\"]\n[display_fields]\ncontact = \" \"",
	];
	for case in cases {
		let err = LookupConfig::from_toml_str(case).unwrap_err();
		assert!(matches!(err, ConfigError::Invalid(_)), "{case}: {err}");
	}
}

#[test]
fn rejects_malformed_toml() {
	assert!(matches!(
		LookupConfig::from_toml_str("entity_types = ["),
		Err(ConfigError::Toml(_))
	));
	assert!(matches!(
		LookupConfig::from_toml_str("entity_types = [\"contact\"]\nunknown = 1"),
		Err(ConfigError::Toml(_))
	));
	assert!(matches!(
		LookupConfig::from_toml_str(r#"entity_types = [" "]"#),
		Err(ConfigError::Toml(_))
	));
}

#[test]
fn load_reads_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "entity_types = [\"lead\"]\nmulti_select = true").unwrap();

	let config = LookupConfig::load(file.path()).unwrap();
	assert!(config.multi_select);
	assert_eq!(config.type_set().into_iter().collect::<Vec<_>>(), vec![ty("lead")]);
}

#[test]
fn load_reports_missing_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("missing.toml");
	match LookupConfig::load(&path) {
		Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
		other => panic!("expected I/O error, got {other:?}"),
	}
}
