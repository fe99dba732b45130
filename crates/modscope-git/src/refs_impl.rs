//! gix-backed HEAD and rev-parse operations.

use gix::revision::spec::parse::{Error as ParseError, single};

use crate::error::GitError;
use crate::gix_repo::GixRepo;
use crate::objects_impl::from_gix_oid;
use crate::types::GitOid;

pub fn head(repo: &GixRepo) -> Result<GitOid, GitError> {
    let id = repo.repo.head_id().map_err(|e| GitError::NotFound {
        message: format!("HEAD does not point at a commit: {e}"),
    })?;
    Ok(from_gix_oid(id.as_ref()))
}

pub fn rev_parse(repo: &GixRepo, spec: &str) -> Result<GitOid, GitError> {
    match repo.repo.rev_parse_single(spec) {
        Ok(id) => Ok(from_gix_oid(id.as_ref())),
        Err(e) => {
            let ambiguous = matches!(&e, single::Error::Parse(inner) if is_ambiguous(inner));
            if ambiguous {
                Err(GitError::AmbiguousRef {
                    spec: spec.to_owned(),
                    message: e.to_string(),
                })
            } else {
                Err(GitError::NotFound {
                    message: format!("rev-parse '{spec}': {e}"),
                })
            }
        }
    }
}

/// Whether `err` is, or chains to, a short id matching several objects.
///
/// gix collects the errors of every interpretation it tried into
/// [`ParseError::Multi`], so the ambiguity may be nested.
fn is_ambiguous(err: &ParseError) -> bool {
    match err {
        ParseError::AmbiguousPrefix { .. } | ParseError::AmbiguousRefAndObject { .. } => true,
        ParseError::Multi { current, next } => {
            current.downcast_ref::<ParseError>().is_some_and(is_ambiguous)
                || next
                    .as_deref()
                    .and_then(|n| n.downcast_ref::<ParseError>())
                    .is_some_and(is_ambiguous)
        }
        _ => false,
    }
}
