use crate::error::BuildError;
use crate::field::{FeatureId, FieldRef};
use crate::host::Feature;
use crate::operator::{evaluate, EvaluationError, Operator};
use crate::reference::ReferenceValue;
use crate::util::CancelFlag;
use matchql::ast::{Literal, Predicate};
use matchql::generate_filter_expression;
use std::collections::BTreeSet;

/// Features of one layer that satisfied `field <operator> reference`, in both representations:
/// the identifier set for selection, and the equivalent filter expression for display filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    field: FieldRef,
    operator: Operator,
    reference: ReferenceValue,
    identifiers: BTreeSet<FeatureId>,
    skipped: usize,
    scanned: usize,
    predicate: Predicate,
    expression: String,
}

impl MatchResult {
    pub fn field(&self) -> &FieldRef { &self.field }
    pub fn operator(&self) -> Operator { self.operator }
    pub fn reference(&self) -> &ReferenceValue { &self.reference }
    pub fn identifiers(&self) -> &BTreeSet<FeatureId> { &self.identifiers }
    pub fn count(&self) -> usize { self.identifiers.len() }
    /// Rows whose value could not be compared with the reference (wrong type or no such field)
    pub fn skipped(&self) -> usize { self.skipped }
    pub fn scanned(&self) -> usize { self.scanned }
    pub fn predicate(&self) -> &Predicate { &self.predicate }
    pub fn expression(&self) -> &str { &self.expression }
    pub fn contains(&self, id: FeatureId) -> bool { self.identifiers.contains(&id) }
}

/// The predicate a match test stands for. NotEqual also admits empty values, since a null candidate
/// differs from any reference.
pub fn filter_predicate(field: &FieldRef, operator: Operator, reference: &ReferenceValue) -> Predicate {
    let comparison = Predicate::compare(field.name.clone(), operator.into(), Literal::from(reference.value()));
    match operator {
        Operator::NotEqual => comparison.or(Predicate::is_null(field.name.clone())),
        _ => comparison,
    }
}

pub struct MatchSetBuilder<'a> {
    field: &'a FieldRef,
    operator: Operator,
    reference: &'a ReferenceValue,
    cancel: Option<&'a CancelFlag>,
}

impl<'a> MatchSetBuilder<'a> {
    pub fn new(field: &'a FieldRef, operator: Operator, reference: &'a ReferenceValue) -> Self { Self { field, operator, reference, cancel: None } }

    /// Stop between features once `flag` is set
    pub fn with_cancel(mut self, flag: &'a CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Scan every feature once. Rows that cannot be compared are counted as skipped, never fatal.
    pub fn build<I>(self, features: I) -> Result<MatchResult, BuildError>
    where
        I: IntoIterator,
        I::Item: Feature,
    {
        self.operator.check(self.field.field_type)?;
        if self.reference.field_type() != self.field.field_type {
            return Err(BuildError::Evaluation(EvaluationError::TypeMismatch {
                expected: self.field.field_type,
                found: self.reference.field_type(),
            }));
        }
        let predicate = filter_predicate(self.field, self.operator, self.reference);
        let expression = generate_filter_expression(&predicate)?;

        let mut identifiers = BTreeSet::new();
        let mut skipped = 0;
        let mut scanned = 0;
        for feature in features {
            if self.cancel.is_some_and(CancelFlag::is_cancelled) {
                tracing::debug!("match scan on {} cancelled after {} features", self.field.name, scanned);
                return Err(BuildError::Cancelled);
            }
            scanned += 1;
            let Some(candidate) = feature.attribute(&self.field.name) else {
                tracing::trace!("feature {} has no field {}, skipped", feature.id(), self.field.name);
                skipped += 1;
                continue;
            };
            match evaluate(self.operator, self.reference.value(), &candidate) {
                Ok(true) => {
                    identifiers.insert(feature.id());
                }
                Ok(false) => {}
                Err(EvaluationError::TypeMismatch { found, .. }) => {
                    tracing::trace!("feature {} holds a {} value, skipped", feature.id(), found);
                    skipped += 1;
                }
                Err(e) => return Err(BuildError::Evaluation(e)),
            }
        }

        tracing::debug!("{} matched {} of {} features ({} skipped)", expression, identifiers.len(), scanned, skipped);
        Ok(MatchResult {
            field: self.field.clone(),
            operator: self.operator,
            reference: self.reference.clone(),
            identifiers,
            skipped,
            scanned,
            predicate,
            expression,
        })
    }
}

/// Build a match set over a layer's features
pub fn build<I>(features: I, field: &FieldRef, operator: Operator, reference: &ReferenceValue) -> Result<MatchResult, BuildError>
where
    I: IntoIterator,
    I::Item: Feature,
{
    MatchSetBuilder::new(field, operator, reference).build(features)
}
