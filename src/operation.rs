//! The fixed catalogue of GraphQL operations and the extractor that maps an
//! incoming document to one of them.
//!
//! The extractor works on the parsed document. A request carries exactly one
//! root field (meta fields such as `__typename` aside); that field is the
//! primary answer because it is also the key the caller reads off `data`.
//! Declared operation names (`query GetAgreements`) and the caller-supplied
//! name are only consulted when the root field names no known operation.

use std::collections::HashMap;

use async_graphql::parser::parse_query;
use async_graphql::parser::types::{
    DocumentOperations, ExecutableDocument, Field, FragmentDefinition, OperationDefinition,
    OperationType, Selection, SelectionSet,
};
use async_graphql::Name;
use async_graphql::Positioned;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::debug;

use crate::errors::{MockError, MockResult};

/// Verb prefixes dropped from declared operation names, checked in order.
const NAME_PREFIXES: [&str; 5] = ["Get", "Create", "Update", "Delete", "List"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// Every root field the mock schema serves. The string form is the field name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum Operation {
    Agreements,
    Agreement,
    Clients,
    Client,
    ClientAccounts,
    HouseholdMembers,
    Products,
    AssetAllocationPolicies,
    ProgramFees,
    ModificationRequests,
    ModificationRequest,
    DashboardStats,
    CreateAgreement,
    UpdateAgreement,
    DeleteAgreement,
    CreateModificationRequest,
    ApproveModificationRequest,
    RejectModificationRequest,
    CancelModificationRequest,
    UploadDocument,
    DeleteDocument,
}

impl Operation {
    pub fn all() -> impl Iterator<Item = Operation> {
        Operation::iter()
    }

    pub fn field_name(self) -> &'static str {
        self.into()
    }

    pub fn kind(self) -> OperationKind {
        match self {
            Operation::Agreements
            | Operation::Agreement
            | Operation::Clients
            | Operation::Client
            | Operation::ClientAccounts
            | Operation::HouseholdMembers
            | Operation::Products
            | Operation::AssetAllocationPolicies
            | Operation::ProgramFees
            | Operation::ModificationRequests
            | Operation::ModificationRequest
            | Operation::DashboardStats => OperationKind::Query,
            _ => OperationKind::Mutation,
        }
    }

    pub fn is_query(self) -> bool {
        self.kind() == OperationKind::Query
    }

    /// Mutations after which cached agreement reads are stale
    pub fn invalidates_agreements(self) -> bool {
        matches!(
            self,
            Operation::CreateAgreement
                | Operation::UpdateAgreement
                | Operation::DeleteAgreement
                | Operation::CreateModificationRequest
                | Operation::ApproveModificationRequest
                | Operation::UploadDocument
                | Operation::DeleteDocument
        )
    }

    /// Read slots cleared when an agreement-affecting mutation succeeds
    pub fn agreement_derived() -> [Operation; 3] {
        [
            Operation::Agreements,
            Operation::Agreement,
            Operation::DashboardStats,
        ]
    }

    fn lookup(name: &str, kind: OperationKind) -> Option<Operation> {
        name.parse::<Operation>().ok().filter(|op| op.kind() == kind)
    }
}

/// Outcome of [`resolve_operation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOperation {
    pub operation: Operation,
    /// Name of the selected operation definition, when it declares one
    pub declared_name: Option<String>,
    /// Key the root field answers under: its alias, else its name
    pub response_key: Option<String>,
}

/// Resolves the operation a request targets.
///
/// `operation_name` is the name the caller passed alongside the document. It
/// selects among several operation definitions and is the last fallback when
/// neither a root field nor the declared name identifies an operation.
pub fn resolve_operation(
    query: &str,
    operation_name: Option<&str>,
) -> MockResult<ResolvedOperation> {
    let document = parse_query(query)
        .map_err(|e| MockError::InvalidRequest(format!("unparseable document: {}", e)))?;

    let (declared, definition) =
        select_operation(&document, operation_name).ok_or(MockError::UnresolvableOperation)?;
    let kind = match definition.ty {
        OperationType::Mutation => OperationKind::Mutation,
        _ => OperationKind::Query,
    };
    let fields = root_fields(&definition.selection_set.node, &document.fragments);
    if fields.len() > 1 {
        return Err(MockError::InvalidRequest(format!(
            "expected a single root field, found {}",
            fields.len()
        )));
    }
    let field = fields.first().copied();

    let resolved = |operation: Operation| ResolvedOperation {
        operation,
        declared_name: declared.map(str::to_string),
        response_key: field.map(|f| f.response_key().node.to_string()),
    };

    if let Some(field) = field {
        if let Some(operation) = Operation::lookup(field.name.node.as_str(), kind) {
            debug!("Resolved operation {} from root field", operation);
            return Ok(resolved(operation));
        }
    }

    declared
        .and_then(|name| from_name(name, kind))
        .or_else(|| operation_name.and_then(|name| from_name(name, kind)))
        .map(resolved)
        .ok_or(MockError::UnresolvableOperation)
}

pub fn extract_operation(query: &str, operation_name: Option<&str>) -> MockResult<Operation> {
    resolve_operation(query, operation_name).map(|r| r.operation)
}

/// Candidates from a declared name: first letter lower-cased, then with a
/// single verb prefix removed. Only one prefix is ever stripped.
pub fn name_candidates(name: &str) -> Vec<String> {
    let mut candidates = vec![lower_first(name)];

    if let Some(rest) = NAME_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty())
    {
        candidates.push(lower_first(rest));
    }

    candidates
}

fn from_name(name: &str, kind: OperationKind) -> Option<Operation> {
    name_candidates(name)
        .iter()
        .find_map(|candidate| Operation::lookup(candidate, kind))
}

fn lower_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn select_operation<'a>(
    document: &'a ExecutableDocument,
    operation_name: Option<&str>,
) -> Option<(Option<&'a str>, &'a OperationDefinition)> {
    match &document.operations {
        DocumentOperations::Single(operation) => Some((None, &operation.node)),
        DocumentOperations::Multiple(operations) => {
            let requested = operation_name.and_then(|name| {
                operations
                    .iter()
                    .find(|(declared, _)| declared.as_str() == name)
            });

            match requested {
                Some((name, operation)) => Some((Some(name.as_str()), &operation.node)),
                None if operations.len() == 1 => operations
                    .iter()
                    .next()
                    .map(|(name, operation)| (Some(name.as_str()), &operation.node)),
                None => None,
            }
        }
    }
}

/// Root fields of a selection set with fragments expanded. Meta fields are
/// skipped.
fn root_fields<'a>(
    selection_set: &'a SelectionSet,
    fragments: &'a HashMap<Name, Positioned<FragmentDefinition>>,
) -> Vec<&'a Field> {
    let mut fields = Vec::new();
    for selection in &selection_set.items {
        match &selection.node {
            Selection::Field(field) => {
                if !field.node.name.node.starts_with("__") {
                    fields.push(&field.node);
                }
            }
            Selection::InlineFragment(fragment) => {
                fields.extend(root_fields(&fragment.node.selection_set.node, fragments))
            }
            Selection::FragmentSpread(spread) => {
                if let Some(fragment) = fragments.get(&spread.node.fragment_name.node) {
                    fields.extend(root_fields(&fragment.node.selection_set.node, fragments));
                }
            }
        }
    }
    fields
}
