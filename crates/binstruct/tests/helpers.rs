use binstruct::{
    ArrayMode, DecodeError, Decoder, Error, Field, FieldKind, Helper, HelperSpec, Spec, Value,
    bits,
};

/// Task status stored on a few bits.
struct Status;

impl Helper for Status {
    fn name(&self) -> &str {
        "STATUS"
    }

    fn is_valid_spec(&self, spec: &HelperSpec) -> bool {
        spec.bit_width <= 64
    }

    fn decode_data(&self, spec: &HelperSpec, raw: &[u8]) -> Result<Value, Error> {
        let label = match bits::read_bits_at(raw, 0, spec.bit_width)? {
            0 => "todo",
            1 => "in progress",
            2 => "done",
            value => {
                return Err(Error::OutOfRange {
                    id: spec.id.clone(),
                    value: value.to_string(),
                });
            }
        };
        Ok(Value::Text(label.to_string()))
    }
}

fn labels(field: &Field) -> Vec<&str> {
    field
        .elements()
        .unwrap()
        .iter()
        .filter_map(|element| element.value().as_str())
        .collect()
}

#[test]
fn test_custom_helper_array_elements() {
    let decoder = Decoder::new().with_helper(Status);
    let spec = [Spec::dyn_array("tasks", ArrayMode::NbElts, 8).of_helper("STATUS")];

    let decoded = decoder.decode(&[0x02, 0x00, 0x02], &spec).unwrap();
    let tasks = &decoded["tasks"];
    assert_eq!(labels(tasks), vec!["todo", "done"]);
    assert_eq!(tasks.bit_width(), 24);
    assert!(
        tasks
            .elements()
            .unwrap()
            .iter()
            .all(|element| element.kind() == &FieldKind::Helper("STATUS".to_string()))
    );

    let spec = [Spec::dyn_array("tasks", ArrayMode::SizeIncl, 4).of_helper("STATUS")];
    let decoded = decoder.decode(&[0x41, 0x20], &spec).unwrap();
    assert_eq!(labels(&decoded["tasks"]), vec!["in progress", "done", "todo"]);
}

#[test]
fn test_custom_helper_in_switch_branch() {
    let decoder = Decoder::new().with_helper(Status);
    let spec = [
        Spec::field("has-status", 1).tagged(),
        Spec::switch(
            "has-status",
            [
                (true, Spec::helper("status", 3, "STATUS")),
                (false, Spec::placeholder("status")),
            ],
        ),
    ];

    let decoded = decoder.decode(&[0x90], &spec).unwrap();
    assert_eq!(decoded["status"].value().as_str(), Some("in progress"));
    assert_eq!(decoded.statistics().decoded_bits, 4);

    let decoded = decoder.decode(&[0x00], &spec).unwrap();
    assert_eq!(decoded["status"].value(), &Value::None);
    assert_eq!(decoded.statistics().decoded_bits, 1);
}

#[test]
fn test_switch_on_custom_helper() {
    let decoder = Decoder::new().with_helper(Status);
    let spec = [
        Spec::helper("state", 3, "STATUS").tagged(),
        Spec::switch(
            "state",
            [
                ("done", Spec::field("finished", 5)),
                ("todo", Spec::placeholder("finished")),
            ],
        ),
    ];

    let decoded = decoder.decode(&[0x55], &spec).unwrap();
    assert_eq!(decoded["state"].value().as_str(), Some("done"));
    assert_eq!(decoded["finished"].value(), &Value::UInt(21));

    let decoded = decoder.decode(&[0x1F], &spec).unwrap();
    assert_eq!(decoded["state"].value().as_str(), Some("todo"));
    assert_eq!(decoded["finished"].bit_width(), 0);

    assert!(matches!(
        decoder.decode(&[0x20], &spec),
        Err(Error::Decode(DecodeError::UnmatchedBranch { .. }))
    ));
}

#[test]
fn test_custom_helper_errors() {
    let decoder = Decoder::new().with_helper(Status);
    let spec = [Spec::dyn_array("tasks", ArrayMode::NbElts, 8).of_helper("STATUS")];
    assert_eq!(
        decoder.decode(&[0x01, 0x03], &spec).unwrap_err(),
        Error::OutOfRange {
            id: "child".to_string(),
            value: "3".to_string()
        }
    );

    assert!(matches!(
        Decoder::new().decode(&[0x01, 0x00], &spec),
        Err(Error::Spec(_))
    ));
}
