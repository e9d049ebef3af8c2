use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use vacancy_harvester::workflows::vacancy::{
    from_raw_item, open_store, CsvVacancyStore, SalaryRange, StorageError, StorageFormat, Vacancy,
    VacancyRecord, VacancyStore,
};

struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new(label: &str) -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "vacancy-harvester-it-{label}-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        Self(dir)
    }

    fn file(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn records() -> (VacancyRecord, VacancyRecord, VacancyRecord) {
    let r1 = Vacancy::new("Rust developer")
        .with_url("https://hh.ru/vacancy/1")
        .with_salary(SalaryRange::new(Some(150000), Some(250000)).with_currency("RUR"))
        .with_requirements("Опыт с Tokio")
        .to_record();
    let r2 = Vacancy::new("Go developer")
        .with_url("https://hh.ru/vacancy/2")
        .with_description("Платёжный шлюз")
        .to_record();
    let r3 = Vacancy::new("QA engineer")
        .with_url("https://hh.ru/vacancy/3")
        .with_salary(SalaryRange::new(None, Some(90000)))
        .to_record();
    (r1, r2, r3)
}

fn exercise_round_trip(store: &dyn VacancyStore) {
    let (r1, r2, r3) = records();

    store.save(&[r1.clone(), r2.clone()]).expect("save succeeds");
    assert_eq!(store.load().expect("reload"), vec![r1.clone(), r2.clone()]);

    store.append(&r3).expect("append succeeds");
    assert_eq!(
        store.load().expect("reload"),
        vec![r1.clone(), r2.clone(), r3.clone()]
    );

    store.delete(&r2).expect("delete succeeds");
    assert_eq!(store.load().expect("reload"), vec![r1, r3]);
}

#[test]
fn json_store_round_trip() {
    let dir = ScratchDir::new("json");
    let store = open_store(StorageFormat::Json, dir.file("vacancies.json"));
    exercise_round_trip(&*store);

    let written = std::fs::read_to_string(store.path()).expect("file exists");
    assert!(written.contains("Опыт с Tokio"), "non-ASCII text is kept literally");
}

#[test]
fn csv_store_round_trip() {
    let dir = ScratchDir::new("csv");
    let store = open_store(StorageFormat::Csv, dir.file("vacancies.csv"));
    exercise_round_trip(&*store);

    let written = std::fs::read_to_string(store.path()).expect("file exists");
    assert_eq!(
        written.lines().next(),
        Some("name,url,salary,description,requirements")
    );
}

fn sparse_records() -> Vec<VacancyRecord> {
    let without_url = from_raw_item(&json!({ "name": "x" }))
        .expect("item parses")
        .to_record();
    let json_looking = Vacancy::new("Go developer")
        .with_url("https://hh.ru/vacancy/2")
        .with_description("[1, 2]")
        .with_requirements("{\"stack\": \"go\"}")
        .to_record();
    vec![without_url, json_looking]
}

#[test]
fn sparse_and_json_looking_records_survive_both_backends() {
    let dir = ScratchDir::new("sparse");
    let (r1, _, _) = records();

    for format in [StorageFormat::Json, StorageFormat::Csv] {
        let store = open_store(format, dir.file(&format!("sparse.{format}")));
        let sparse = sparse_records();
        assert_eq!(sparse[0]["url"], json!(""));

        let mut stored = sparse.clone();
        stored.insert(0, r1.clone());
        store.save(&stored).expect("save succeeds");
        assert_eq!(store.load().expect("reload"), stored, "{format} reload");

        for record in &sparse {
            store.delete(record).expect("delete succeeds");
        }
        assert_eq!(
            store.load().expect("reload"),
            vec![r1.clone()],
            "{format} delete"
        );
    }
}

#[test]
fn delete_removes_every_equal_entry() {
    let dir = ScratchDir::new("json-dupes");
    let store = open_store(StorageFormat::Json, dir.file("vacancies.json"));
    let (r1, r2, _) = records();

    store
        .save(&[r1.clone(), r2.clone(), r1.clone()])
        .expect("save succeeds");
    store.delete(&r1).expect("delete succeeds");
    assert_eq!(store.load().expect("reload"), vec![r2]);
}

#[test]
fn csv_save_without_records_is_an_error() {
    let dir = ScratchDir::new("csv-empty");
    let store = CsvVacancyStore::new(dir.file("vacancies.csv"));
    let error = store.save(&[]).expect_err("empty save rejected");
    assert!(matches!(error, StorageError::EmptyTabularSave));
    assert!(!store.path().exists());
}

#[test]
fn append_and_delete_need_an_existing_file() {
    let dir = ScratchDir::new("missing");
    let (r1, _, _) = records();

    for format in [StorageFormat::Json, StorageFormat::Csv] {
        let store = open_store(format, dir.file(&format!("absent.{format}")));
        assert!(matches!(store.append(&r1), Err(StorageError::Io { .. })));
        assert!(matches!(store.delete(&r1), Err(StorageError::Io { .. })));
        assert!(!store.path().exists());
    }
}

#[test]
fn json_store_accepts_arbitrary_objects() {
    let dir = ScratchDir::new("json-free-form");
    let store = open_store(StorageFormat::Json, dir.file("vacancies.json"));
    let record = json!({ "title": "free form", "tags": ["remote"] })
        .as_object()
        .cloned()
        .expect("object literal");

    store.save(&[]).expect("empty json save is fine");
    store.append(&record).expect("append succeeds");
    assert_eq!(store.load().expect("reload"), vec![record]);
}
