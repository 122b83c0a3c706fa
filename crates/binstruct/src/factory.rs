//! The [Decoder]: turns a specification node plus a bit range into a [Field].

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    array,
    classify::{self, Classified, SpecKind},
    context::Context,
    errors::{DecodeError, Result, SpecError},
    field::Field,
    helper::{Helper, Registry},
    hex, primitive, record,
    spec::{Key, Spec},
    structure::{ROOT_ID, Structure},
};

/// Decodes data according to specifications, using the helpers of its [Registry].
///
/// A decoder holds no per-decode state; one instance can serve any number of decodes.
#[derive(Debug, Default)]
pub struct Decoder {
    registry: Registry,
}

impl Decoder {
    /// A decoder with the built-in helpers.
    pub fn new() -> Self {
        Decoder::with_registry(Registry::new())
    }

    /// A decoder without any helper.
    pub fn empty() -> Self {
        Decoder::with_registry(Registry::empty())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Decoder { registry }
    }

    /// Adds `helper` to the registry, replacing any helper with the same name.
    pub fn with_helper(mut self, helper: impl Helper + 'static) -> Self {
        self.register(helper);
        self
    }

    pub fn register(&mut self, helper: impl Helper + 'static) -> Option<Box<dyn Helper>> {
        self.registry.register(helper)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Determines the kind of `spec`, validating everything below it.
    pub fn classify(&self, spec: &Spec) -> Result<SpecKind, SpecError> {
        classify::classify(spec, &self.registry)
    }

    /// Validates a top-level specification without decoding anything.
    pub fn validate(&self, spec: &[Spec]) -> Result<(), SpecError> {
        self.classify(&Spec::structure(ROOT_ID, spec.to_vec()))
            .map(|_| ())
    }

    /// Decodes `data` as the ordered top-level fields of `spec`.
    pub fn decode(&self, data: &[u8], spec: &[Spec]) -> Result<Structure> {
        Structure::decode_with(self, data, spec)
    }

    /// Like [Decoder::decode], with data given as hexadecimal text.
    pub fn decode_hex(&self, data: &str, spec: &[Spec]) -> Result<Structure> {
        self.decode(&hex::decode_hex(data)?, spec)
    }

    /// Decodes one field starting at bit `offset` of `data`.
    ///
    /// `offset` addresses a bit of the first byte; callers slice `data` to the byte
    /// holding the field's first bit. Switches need a `context` holding their target
    /// and resolve to the field their branch produces. A struct given no context
    /// decodes its children against a fresh one.
    pub fn decode_field(
        &self,
        spec: &Spec,
        data: &[u8],
        offset: usize,
        context: Option<&mut Context>,
    ) -> Result<Field> {
        let classified = classify::classify_node(spec, &self.registry)?;
        if offset >= 8 {
            return Err(DecodeError::OffsetOutOfByte {
                id: spec.label().to_string(),
                offset,
            }
            .into());
        }

        let field = match classified {
            Classified::Placeholder { id } => primitive::placeholder(id),
            Classified::Boolean { id, tagged } => primitive::boolean(id, tagged, data, offset)?,
            Classified::Integer { id, width, tagged } => {
                primitive::integer(id, width, tagged, data, offset)?
            }
            Classified::Helper { helper, spec } => primitive::helper(helper, spec, data, offset)?,
            Classified::Struct { id, children } => {
                record::decode(self, id, children, data, offset, context)?
            }
            Classified::Switch { target, branches } => {
                return self.decode_switch(target, branches, data, offset, context);
            }
            Classified::DynArray {
                id,
                mode,
                unit,
                element,
            } => array::decode(self, id, mode, unit, element, data, offset)?,
        };

        let field = field.capture_raw(data, offset)?;
        trace!(
            id = field.id(),
            kind = ?field.kind(),
            offset,
            bit_width = field.bit_width(),
            value = %field.value(),
            "decoded field"
        );

        Ok(field)
    }

    fn decode_switch(
        &self,
        target: &str,
        branches: &IndexMap<Key, Spec>,
        data: &[u8],
        offset: usize,
        context: Option<&mut Context>,
    ) -> Result<Field> {
        let context = context.ok_or_else(|| DecodeError::MissingContext {
            target: target.to_string(),
        })?;
        let value = context
            .get(target)
            .map(|field| field.value().clone())
            .ok_or_else(|| DecodeError::UnknownTarget {
                target: target.to_string(),
            })?;

        let branch = value.to_key().and_then(|key| {
            branches
                .get(&key)
                .or_else(|| key.alias().and_then(|alias| branches.get(&alias)))
        });
        let Some(branch) = branch else {
            return Err(DecodeError::UnmatchedBranch {
                target: target.to_string(),
                value: value.to_string(),
            }
            .into());
        };

        debug!(target_field = target, value = %value, "switch resolved");
        self.decode_field(branch, data, offset, Some(context))
    }
}
