use tabula::{Options, Record};

#[derive(Debug, Default, Record)]
#[tabula(rename_all = "PascalCase")]
pub struct Pascal {
    cfg_id: i32,
    r#type: String,
}

#[derive(Debug, Default, Record)]
#[tabula(rename_all = "camelCase")]
pub struct Camel {
    cfg_id: i32,
    image_quality_level: i32,
}

#[derive(Debug, Default, Record)]
#[tabula(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Screaming {
    cfg_id: i32,
    #[tabula(rename = "Name")]
    name: String,
}

#[test]
fn test_pascal_case() {
    let rows = vec![vec!["CfgId", "Type"], vec!["1", "weapon"]];
    let m: Vec<Pascal> = tabula::read_slice(&rows, &Options::default()).unwrap();
    assert_eq!(m[0].cfg_id, 1);
    assert_eq!(m[0].r#type, "weapon");
}

#[test]
fn test_camel_case() {
    let rows = vec![vec!["cfgId", "imageQualityLevel"], vec!["2", "3"]];
    let m: Vec<Camel> = tabula::read_slice(&rows, &Options::default()).unwrap();
    assert_eq!((m[0].cfg_id, m[0].image_quality_level), (2, 3));
}

#[test]
fn test_rename_beats_rename_all() {
    let rows = vec![vec!["CFG_ID", "Name", "NAME"], vec!["4", "a", "b"]];
    let m: Vec<Screaming> = tabula::read_slice(&rows, &Options::default()).unwrap();
    assert_eq!(m[0].cfg_id, 4);
    assert_eq!(m[0].name, "a");
}
