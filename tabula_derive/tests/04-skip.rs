use tabula::{Options, Record};

#[derive(Debug, Default, Record)]
pub struct Model {
    id: u32,
    #[tabula(skip)]
    cache: Vec<u32>,
    #[tabula(skip)]
    handle: Option<std::rc::Rc<String>>,
}

#[test]
fn test_skip() {
    let rows = vec![vec!["id", "cache"], vec!["1", "1;2;3"]];
    let m: Vec<Model> = tabula::read_slice(&rows, &Options::default()).unwrap();
    assert_eq!(m[0].id, 1);
    assert!(m[0].cache.is_empty());
    assert!(m[0].handle.is_none());
}
