//! End-to-end behaviour of fields as the panel uses them: declare, resolve,
//! serialize, fill.

use fieldset::{
    attribute_for, Field, FieldKind, FieldsContext, FieldsConfig, Fields, Preload, Request,
    Resource, View,
};
use serde_json::{json, Value};

fn every_kind(name: &str) -> Vec<Field> {
    vec![
        Field::text(name),
        Field::textarea(name),
        Field::number(name),
        Field::boolean(name),
        Field::file(name),
        Field::audio(name),
        Field::heading(name),
        Field::line(name),
        Field::id(name),
    ]
}

#[test]
fn attribute_is_snake_cased_name_for_every_kind() {
    for field in every_kind("Theme Song") {
        assert_eq!(
            field.json_serialize()["attribute"],
            json!("theme_song"),
            "{}",
            field.kind().name()
        );
    }
    for field in every_kind("Theme Song") {
        let field = field.attribute("song");
        assert_eq!(field.json_serialize()["attribute"], json!("song"));
    }
    assert_eq!(attribute_for("Theme Song"), "theme_song");
}

#[test]
fn every_kind_serializes_the_base_keys() {
    let base = [
        "name",
        "attribute",
        "component",
        "value",
        "nullable",
        "readonly",
        "helpText",
        "showOnIndex",
        "showOnDetail",
        "showOnCreation",
        "showOnUpdate",
    ];
    for field in every_kind("Anything") {
        let wire = field.json_serialize();
        for key in base {
            assert!(wire.contains_key(key), "{} missing {key}", field.kind().name());
        }
        assert_eq!(wire["component"], json!(field.component()));
        for (key, value) in field.meta() {
            assert_eq!(wire[&key], value);
        }
    }
}

#[test]
fn big_int_id_scenario() {
    let mut id = Field::id("User ID")
        .attribute("user_id")
        .as_big_int()
        .copyable();
    id.resolve(&Resource::new().with("user_id", "9223372036854775807"));

    assert_eq!(id.value(), &json!("9223372036854775807"));
    let wire = id.json_serialize();
    assert_eq!(wire["asBigInt"], json!(true));
    assert_eq!(wire["copyable"], json!(true));
    assert_eq!(wire["sortable"], json!(true));
    assert_eq!(wire["showOnCreation"], json!(false));
}

#[test]
fn line_with_callback_scenario() {
    let mut line = Field::line("Full Info").resolve_using(|user, _| {
        json!(format!(
            "{} ({})",
            user.str("name").unwrap_or_default(),
            user.str("email").unwrap_or_default()
        ))
    });
    let user = Resource::new()
        .with("name", "John Doe")
        .with("email", "john@example.com");

    line.resolve(&user);
    assert_eq!(line.value(), &json!("John Doe (john@example.com)"));
}

#[test]
fn heading_and_line_fill_never_touch_the_model() {
    let payloads = [
        Request::new(),
        Request::new().with("intro", "x"),
        Request::new().with("intro", Value::Null).with("summary", 5),
        Request::new().with("summary", json!({"nested": true})),
    ];
    for request in payloads {
        let mut model = Resource::new().with("intro", "keep").with("summary", "keep");
        let before = model.clone();
        Field::heading("Intro").fill(&request, &mut model);
        Field::line("Summary").fill(&request, &mut model);
        assert_eq!(model, before);
    }
}

#[test]
fn default_visibility_table() {
    let shown = |field: &Field| View::ALL.map(|v| field.is_shown_on(v));

    assert_eq!(shown(&Field::id("ID")), [true, true, false, true]);
    assert_eq!(shown(&Field::heading("Intro")), [false, true, true, true]);
    assert_eq!(shown(&Field::text("Name")), [true, true, true, true]);
    assert_eq!(shown(&Field::textarea("Bio")), [false, true, true, true]);
}

#[test]
fn preload_round_trips_through_accessor_and_meta() {
    for preload in [Preload::None, Preload::Metadata, Preload::Auto] {
        let field = Field::audio("Theme Song").preload(preload);
        assert_eq!(field.preload_mode(), Some(preload));
        assert_eq!(field.meta()["preload"], json!(preload.to_string()));
        assert_eq!("auto".parse::<Preload>().unwrap(), Preload::Auto);
    }
    assert!("eager".parse::<Preload>().is_err());
}

#[test]
fn readonly_generic_field_is_still_filled() {
    let fields = Fields::new().with(Field::text("Email").readonly(true));
    let mut model = Resource::new().with("email", "old@example.com");
    fields.fill(&Request::new().with("email", "new@example.com"), &mut model);
    assert_eq!(model.str("email"), Some("new@example.com"));
}

#[test]
fn callback_value_wins_over_raw_attribute() {
    let mut field = Field::text("Name").resolve_using(|_, _| json!("from callback"));
    field.resolve(&Resource::new().with("name", "raw"));
    assert_eq!(field.value(), &json!("from callback"));

    let mut plain = Field::text("Name");
    plain.resolve(&Resource::new().with("name", "raw"));
    assert_eq!(plain.value(), &json!("raw"));
}

#[tokio::test]
async fn registry_to_wire_round_trip() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().join("resources");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("users.yaml"),
        r#"
name: users
fields:
  - name: User ID
    type: { kind: id, as_big_int: true }
  - name: Account
    type: { kind: heading, as_html: false }
  - name: Email
    type: { kind: text }
    rules: [required, email]
  - name: Avatar
    type: { kind: file, accepted_types: "image/*" }
    nullable: true
"#,
    )
    .unwrap();
    std::fs::write(tmp.path().join("fieldset.toml"), "[file]\ndisk = \"s3\"\n").unwrap();

    let config = FieldsConfig::load(tmp.path()).unwrap();
    let ctx = FieldsContext::open(tmp.path())
        .with_config(config)
        .build()
        .await
        .unwrap();
    let fields = ctx.fields_for("users").unwrap();

    let record = Resource::new()
        .with("user_id", 9_007_199_254_740_993u64)
        .with("email", "jane@example.com")
        .with("avatar", "avatars/jane.png");
    let wire = fields.serialize_for_view(View::Index, &Request::new(), &record);
    let items = wire.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["value"], json!("9007199254740993"));
    assert_eq!(items[1]["value"], json!("jane@example.com"));
    assert_eq!(items[2]["disk"], json!("s3"));
    assert_eq!(items[2]["acceptedTypes"], json!("image/*"));

    let detail = fields.for_view(View::Detail, &Request::new(), &record);
    assert!(matches!(detail[1].kind(), FieldKind::Heading(_)));
    assert_eq!(detail[1].value(), &json!("Account"));

    assert_eq!(
        fields.creation_rules()["email"],
        vec!["required".to_string(), "email".to_string()]
    );

    let mut model = record.clone();
    fields.fill(
        &Request::new()
            .with("user_id", 1)
            .with("email", "new@example.com")
            .with("avatar", Value::Null),
        &mut model,
    );
    assert_eq!(model.get("user_id"), record.get("user_id"));
    assert_eq!(model.str("email"), Some("new@example.com"));
    assert_eq!(model.str("avatar"), Some("avatars/jane.png"));
}
