//! End-to-end diff + render over a realistic pipeline pair.

use conveyor_core::{ConfigDocument, Value};
use conveyor_diff::{diff, ChangeKind, CollectionKind, DiffRenderer, PlainDecorator};
use rstest::rstest;

const REMOTE: &str = r#"
groups:
- name: some-group
  jobs: [job-1, job-2]
  resources: [resource-1, resource-2]
- name: some-other-group
  jobs: [job-3, job-4]
  resources: [resource-6, resource-4]
resources:
- name: some-resource
  type: some-type
  source: {source-config: some-value}
- name: some-other-resource
  type: some-other-type
  source: {source-config: some-value}
- name: some-resource-with-int-field
  type: some-type
  source: {source-config: 5}
resource_types:
- name: some-resource-type
  type: some-type
  source: {source-config: some-value}
- name: some-other-resource-type
  type: some-other-type
  source: {source-config: some-value}
jobs:
- name: some-job
  public: true
  serial: true
- name: some-unchanged-job
- name: some-other-job
"#;

const LOCAL: &str = r#"
groups:
- name: some-group
  jobs: [job-1, job-2, some-new-job]
  resources: [resource-1, resource-2]
- name: some-new-group
  jobs: [job-3, job-4]
  resources: [resource-6, resource-4]
resources:
- name: some-resource
  type: some-new-type
  source: {source-config: some-value}
- name: some-new-resource
  type: some-other-type
  source: {source-config: some-value}
- name: some-resource-with-int-field
  type: some-type
  source: {source-config: 5.0}
resource_types:
- name: some-resource-type
  type: some-new-type
  source: {source-config: some-value}
- name: some-new-resource-type
  type: some-other-type
  source: {source-config: some-value}
jobs:
- name: some-job
  public: true
- name: some-unchanged-job
- name: some-new-job
"#;

fn documents() -> (ConfigDocument, ConfigDocument) {
    (
        ConfigDocument::from_yaml(REMOTE).expect("remote"),
        ConfigDocument::from_yaml(LOCAL).expect("local"),
    )
}

fn report() -> String {
    let (remote, local) = documents();
    DiffRenderer::new(PlainDecorator)
        .render(&diff(&remote, &local))
        .expect("render")
}

#[test]
fn every_collection_yields_changed_removed_added_in_order() {
    let (remote, local) = documents();
    let records = diff(&remote, &local);

    let mut expected = Vec::new();
    for collection in CollectionKind::all() {
        for kind in [ChangeKind::Changed, ChangeKind::Removed, ChangeKind::Added] {
            expected.push((*collection, kind));
        }
    }
    let got: Vec<(CollectionKind, ChangeKind)> =
        records.iter().map(|r| (r.collection, r.kind())).collect();
    assert_eq!(got, expected);
}

#[rstest]
#[case("group some-group has changed")]
#[case("group some-other-group has been removed")]
#[case("group some-new-group has been added")]
#[case("resource some-resource has changed")]
#[case("resource some-other-resource has been removed")]
#[case("resource some-new-resource has been added")]
#[case("resource type some-resource-type has changed")]
#[case("resource type some-other-resource-type has been removed")]
#[case("resource type some-new-resource-type has been added")]
#[case("job some-job has changed")]
#[case("job some-other-job has been removed")]
#[case("job some-new-job has been added")]
fn report_contains_summary(#[case] summary: &str) {
    assert!(report().contains(summary), "missing '{summary}'");
}

#[rstest]
#[case("+ - some-new-job")]
#[case("- name: some-other-group")]
#[case("+ name: some-new-group")]
#[case("- type: some-type")]
#[case("+ type: some-new-type")]
#[case("- serial: true")]
#[case("+ name: some-new-job")]
fn report_contains_decorated_line(#[case] line: &str) {
    assert!(report().contains(line), "missing '{line}'");
}

#[test]
fn unchanged_entities_are_absent_from_report() {
    let report = report();
    assert!(!report.contains("some-resource-with-int-field"));
    assert!(!report.contains("some-unchanged-job"));
}

#[test]
fn diff_of_document_with_itself_is_empty() {
    let (remote, local) = documents();
    assert!(diff(&remote, &remote).is_empty());
    assert!(diff(&local, &local).is_empty());
}

#[test]
fn inputs_are_not_modified() {
    let (remote, local) = documents();
    let (remote_copy, local_copy) = (remote.clone(), local.clone());
    let _ = diff(&remote, &local);
    assert_eq!(remote, remote_copy);
    assert_eq!(local, local_copy);
}

#[test]
fn single_source_field_change_is_exactly_one_record() {
    let (remote, _) = documents();
    let mut local = remote.clone();
    local.resources[1]
        .source
        .insert("source-config".into(), Value::from("other-value"));

    let records = diff(&remote, &local);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "some-other-resource");

    let report = DiffRenderer::new(PlainDecorator)
        .render(&records)
        .expect("render");
    assert!(report.contains("source-config: some-value"));
    assert!(report.contains("source-config: other-value"));
}

// ---------------------------------------------------------------------------
// Value edge cases
// ---------------------------------------------------------------------------

fn resource_with_source(source: &str) -> ConfigDocument {
    ConfigDocument::from_yaml(&format!(
        "resources:\n- name: r\n  type: t\n  source: {source}\n"
    ))
    .expect("yaml")
}

#[test]
fn nan_source_value_diffs_to_nothing_against_itself() {
    let doc = resource_with_source("{x: .nan}");
    assert!(diff(&doc, &doc).is_empty());
    assert!(diff(&doc, &doc.clone()).is_empty());
}

#[rstest]
#[case("{x: 18446744073709551615}", "{x: 18446744073709551614}")]
#[case("{x: 9007199254740993}", "{x: 9007199254740992.0}")]
#[case("{x: 5}", "{x: 5.5}")]
fn distinct_numbers_are_a_change(#[case] remote: &str, #[case] local: &str) {
    let records = diff(&resource_with_source(remote), &resource_with_source(local));
    assert_eq!(records.len(), 1, "{remote} vs {local}");
    assert_eq!(records[0].kind(), ChangeKind::Changed);
}

#[test]
fn non_string_keys_in_nested_mappings_are_accepted() {
    let yaml = "jobs:\n- name: j\n  plan:\n  - task: t\n    params: {1: one, true: yes}\n";
    let remote = ConfigDocument::from_yaml(yaml).expect("parse");
    assert!(diff(&remote, &remote).is_empty());

    let local = ConfigDocument::from_yaml(&yaml.replace("1: one", "1: two")).expect("parse");
    let records = diff(&remote, &local);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "j");
}
