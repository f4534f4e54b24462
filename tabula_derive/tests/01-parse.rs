use tabula::{Options, Record};

#[derive(Debug, Default, PartialEq, Record)]
pub struct Model {
    human: bool,
    first: Option<u16>,
    fourth: u16,
    names: Vec<String>,
}

#[test]
fn test_parse() {
    let rows = vec![
        vec!["human", "first", "fourth", "names"],
        vec!["true", "1", "2", "CCC;DDD"],
    ];

    let m: Vec<Model> = tabula::read_slice(&rows, &Options::default()).unwrap();
    assert_eq!(
        m,
        vec![Model {
            human: true,
            first: Some(1),
            fourth: 2,
            names: vec![String::from("CCC"), String::from("DDD")],
        }]
    );
}

#[test]
fn test_unknown_field() {
    let options = Options::default();
    let mut m = Model::default();
    assert!(tabula::populate_field(&mut m, "fourth", "4", &options));
    assert!(!tabula::populate_field(&mut m, "fifth", "5", &options));
    assert_eq!(m.fourth, 4);
}
