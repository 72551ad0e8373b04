use super::*;

const ID: &str = "11111111-1111-1111-1111-111111111111";

#[test]
fn parse_filter_command() {
	let cli = Cli::try_parse_from(["refbind", "filter", "--type", "Contact", "x"]).unwrap();
	let Command::Filter { entity_type, value } = cli.command else {
		panic!("expected filter");
	};
	assert_eq!(entity_type.as_str(), "contact");
	assert_eq!(value, "x");
	assert!(!cli.verbose);
}

#[test]
fn parse_add_command_with_picks() {
	let pick = format!("{{{}}}:Lead", ID.to_uppercase());
	let cli = Cli::try_parse_from(["refbind", "-v", "add", "--records", "r.json", "", &pick]).unwrap();
	let Command::Add { session, picks } = cli.command else {
		panic!("expected add");
	};
	assert!(cli.verbose);
	assert_eq!(session.records, PathBuf::from("r.json"));
	assert_eq!(session.config, None);
	assert_eq!(session.value, "");
	assert_eq!(picks.len(), 1);
	assert_eq!(picks[0].id.as_str(), ID);
	assert_eq!(picks[0].entity_type.as_str(), "lead");
}

#[test]
fn parse_remove_command() {
	let cli = Cli::try_parse_from(["refbind", "remove", "-r", "r.json", "-c", "c.toml", "v", ID]).unwrap();
	let Command::Remove { session, id } = cli.command else {
		panic!("expected remove");
	};
	assert_eq!(session.config, Some(PathBuf::from("c.toml")));
	assert_eq!(session.value, "v");
	assert_eq!(id, ID);
}

#[test]
fn rejects_malformed_picks() {
	let two = format!("{ID}:lead;{ID}:contact");
	for pick in ["not-a-guid:lead", "", two.as_str()] {
		assert!(
			Cli::try_parse_from(["refbind", "add", "-r", "r.json", "", pick]).is_err(),
			"{pick:?}"
		);
	}
}

#[test]
fn add_requires_a_pick() {
	assert!(Cli::try_parse_from(["refbind", "add", "-r", "r.json", ""]).is_err());
}
