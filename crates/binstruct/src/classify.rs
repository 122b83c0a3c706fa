//! Specification classifier.
//!
//! Classifying a node validates it together with everything below it (struct
//! children, switch branches, array elements) without reading any data, so a whole
//! tree can be checked up front. Classification has no side effects and can be
//! repeated freely.

use indexmap::IndexMap;

use crate::{
    errors::SpecError,
    helper::{Helper, HelperSpec, Registry},
    spec::{self, ArrayElement, ArrayMode, Key, MAX_INTEGER_WIDTH, Spec, UNIT_WIDTHS},
};

/// The closed set of field kinds a specification can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    Placeholder,
    Boolean,
    Integer,
    Helper,
    Struct,
    Switch,
    DynArray,
}

/// A validated specification node, borrowing its parts from the [Spec].
pub enum Classified<'a> {
    Placeholder {
        id: &'a str,
    },
    Boolean {
        id: &'a str,
        tagged: bool,
    },
    Integer {
        id: &'a str,
        width: usize,
        tagged: bool,
    },
    Helper {
        helper: &'a dyn Helper,
        spec: HelperSpec,
    },
    Struct {
        id: &'a str,
        children: &'a [Spec],
    },
    Switch {
        target: &'a str,
        branches: &'a IndexMap<Key, Spec>,
    },
    DynArray {
        id: &'a str,
        mode: ArrayMode,
        unit: usize,
        element: Option<&'a ArrayElement>,
    },
}

impl Classified<'_> {
    pub fn kind(&self) -> SpecKind {
        match self {
            Classified::Placeholder { .. } => SpecKind::Placeholder,
            Classified::Boolean { .. } => SpecKind::Boolean,
            Classified::Integer { .. } => SpecKind::Integer,
            Classified::Helper { .. } => SpecKind::Helper,
            Classified::Struct { .. } => SpecKind::Struct,
            Classified::Switch { .. } => SpecKind::Switch,
            Classified::DynArray { .. } => SpecKind::DynArray,
        }
    }
}

/// Determines the kind of `spec`, validating the whole subtree.
pub fn classify(spec: &Spec, registry: &Registry) -> Result<SpecKind, SpecError> {
    classify_node(spec, registry).map(|classified| classified.kind())
}

/// Like [classify], but keeps the validated parts of the node.
pub fn classify_node<'a>(
    spec: &'a Spec,
    registry: &'a Registry,
) -> Result<Classified<'a>, SpecError> {
    match spec {
        Spec::Field {
            id,
            width,
            helper,
            tagged,
        } => classify_field(id, width.unwrap_or(0), helper.as_deref(), *tagged, registry),
        Spec::Struct { id, children } => {
            for child in children {
                classify(child, registry).map_err(|source| SpecError::InvalidChild {
                    parent: id.clone(),
                    source: Box::new(source),
                })?;
            }

            Ok(Classified::Struct { id, children })
        }
        Spec::Switch { target, branches } => {
            for (key, branch) in branches {
                classify(branch, registry).map_err(|source| SpecError::InvalidBranch {
                    target: target.clone(),
                    key: key.clone(),
                    source: Box::new(source),
                })?;
            }

            Ok(Classified::Switch { target, branches })
        }
        Spec::DynArray {
            id,
            mode,
            unit,
            element,
        } => {
            if !UNIT_WIDTHS.contains(unit) {
                return Err(SpecError::InvalidUnitWidth {
                    id: id.clone(),
                    width: *unit,
                });
            }

            if element.is_some() {
                let element_spec = spec::element_spec(*unit, element.as_ref());
                classify(&element_spec, registry).map_err(|source| SpecError::InvalidElement {
                    array: id.clone(),
                    source: Box::new(source),
                })?;
            }

            Ok(Classified::DynArray {
                id,
                mode: *mode,
                unit: *unit,
                element: element.as_ref(),
            })
        }
    }
}

fn classify_field<'a>(
    id: &'a str,
    width: usize,
    helper: Option<&'a str>,
    tagged: bool,
    registry: &'a Registry,
) -> Result<Classified<'a>, SpecError> {
    match (width, helper) {
        (0, None) if !tagged => Ok(Classified::Placeholder { id }),
        (0, _) => Err(SpecError::InvalidWidth {
            id: id.to_string(),
            width,
        }),
        (_, Some(name)) => {
            let (helper, spec) = registry.resolve(id, width, tagged, name)?;
            Ok(Classified::Helper { helper, spec })
        }
        (1, None) => Ok(Classified::Boolean { id, tagged }),
        (2..=MAX_INTEGER_WIDTH, None) => Ok(Classified::Integer { id, width, tagged }),
        (_, None) => Err(SpecError::InvalidWidth {
            id: id.to_string(),
            width,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ASCII, RAW_DATA};

    fn kind(spec: &Spec) -> Result<SpecKind, SpecError> {
        classify(spec, &Registry::new())
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(kind(&Spec::placeholder("p")), Ok(SpecKind::Placeholder));
        assert_eq!(kind(&Spec::field("p", 0)), Ok(SpecKind::Placeholder));
    }

    #[test]
    fn test_tagged_placeholder_is_invalid() {
        assert_eq!(
            kind(&Spec::field("p", 0).tagged()),
            Err(SpecError::InvalidWidth {
                id: "p".to_string(),
                width: 0
            })
        );
        assert!(kind(&Spec::helper("p", 0, RAW_DATA)).is_err());
    }

    #[test]
    fn test_booleans_and_integers() {
        assert_eq!(kind(&Spec::field("b", 1)), Ok(SpecKind::Boolean));
        assert_eq!(kind(&Spec::field("b", 1).tagged()), Ok(SpecKind::Boolean));
        assert_eq!(kind(&Spec::field("i", 2)), Ok(SpecKind::Integer));
        assert_eq!(kind(&Spec::field("i", 64)), Ok(SpecKind::Integer));
        assert_eq!(kind(&Spec::field("i", 2).tagged()), Ok(SpecKind::Integer));
        assert_eq!(
            kind(&Spec::field("i", 65)),
            Err(SpecError::InvalidWidth {
                id: "i".to_string(),
                width: 65
            })
        );
    }

    #[test]
    fn test_helpers() {
        assert_eq!(kind(&Spec::helper("s", 96, ASCII)), Ok(SpecKind::Helper));
        assert_eq!(kind(&Spec::helper("s", 96, ASCII).tagged()), Ok(SpecKind::Helper));
        assert_eq!(kind(&Spec::helper("r", 1, RAW_DATA)), Ok(SpecKind::Helper));
        assert_eq!(kind(&Spec::helper("r", 200, RAW_DATA)), Ok(SpecKind::Helper));
        assert!(matches!(
            kind(&Spec::helper("s", 94, ASCII)),
            Err(SpecError::HelperRejected { width: 94, .. })
        ));
        assert!(matches!(
            kind(&Spec::helper("s", 95, ASCII)),
            Err(SpecError::HelperRejected { width: 95, .. })
        ));
    }

    #[test]
    fn test_unregistered_helper() {
        assert_eq!(
            classify(&Spec::helper("s", 8, ASCII), &Registry::empty()),
            Err(SpecError::UnknownHelper {
                id: "s".to_string(),
                helper: ASCII.to_string()
            })
        );
    }

    #[test]
    fn test_struct_reports_failing_child() {
        let spec = Spec::structure(
            "outer",
            [
                Spec::field("ok", 3),
                Spec::structure("inner", [Spec::field("bad", 70)]),
            ],
        );

        assert_eq!(
            kind(&spec),
            Err(SpecError::InvalidChild {
                parent: "outer".to_string(),
                source: Box::new(SpecError::InvalidChild {
                    parent: "inner".to_string(),
                    source: Box::new(SpecError::InvalidWidth {
                        id: "bad".to_string(),
                        width: 70
                    }),
                }),
            })
        );
        assert_eq!(kind(&Spec::structure("empty", [])), Ok(SpecKind::Struct));
    }

    #[test]
    fn test_switch() {
        let spec = Spec::switch(
            "t",
            [
                (0u64, Spec::field("as-int", 8)),
                (1u64, Spec::helper("as-str", 16, ASCII)),
                (2u64, Spec::structure("as-struct", [Spec::field("a", 3)])),
            ],
        );
        assert_eq!(kind(&spec), Ok(SpecKind::Switch));

        let invalid = Spec::switch("t", [(true, Spec::helper("s", 12, ASCII))]);
        assert!(matches!(
            kind(&invalid),
            Err(SpecError::InvalidBranch { key: Key::Bool(true), .. })
        ));
    }

    #[test]
    fn test_dyn_arrays() {
        for mode in [ArrayMode::NbElts, ArrayMode::SizeExcl, ArrayMode::SizeIncl] {
            for unit in UNIT_WIDTHS {
                assert_eq!(
                    kind(&Spec::dyn_array("a", mode, unit)),
                    Ok(SpecKind::DynArray)
                );
            }
        }

        assert_eq!(
            kind(&Spec::dyn_array("a", ArrayMode::SizeIncl, 16).of_helper(ASCII)),
            Ok(SpecKind::DynArray)
        );
        assert_eq!(
            kind(&Spec::dyn_array("a", ArrayMode::SizeIncl, 16).of_struct([
                Spec::field("x", 3),
                Spec::field("y", 5),
                Spec::helper("c", 8, ASCII),
            ])),
            Ok(SpecKind::DynArray)
        );
    }

    #[test]
    fn test_invalid_dyn_arrays() {
        assert_eq!(
            kind(&Spec::dyn_array("a", ArrayMode::NbElts, 12)),
            Err(SpecError::InvalidUnitWidth {
                id: "a".to_string(),
                width: 12
            })
        );
        assert!(matches!(
            kind(&Spec::dyn_array("a", ArrayMode::NbElts, 8).of_helper("NOPE")),
            Err(SpecError::InvalidElement { .. })
        ));
        assert!(matches!(
            kind(&Spec::dyn_array("a", ArrayMode::NbElts, 8).of_struct([Spec::field("x", 99)])),
            Err(SpecError::InvalidElement { .. })
        ));
    }

    #[test]
    fn test_classification_is_repeatable() {
        let spec = Spec::structure("s", [Spec::field("a", 3), Spec::helper("b", 8, ASCII)]);
        let registry = Registry::new();
        assert_eq!(classify(&spec, &registry), classify(&spec, &registry));
    }
}
