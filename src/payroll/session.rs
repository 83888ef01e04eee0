use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{compose_net_pay, DeductionKind, PayrollComputed, PayrollDraft, PayrollError, TaxConstants};

/// A draft tagged with the revision it was computed at. This is both the
/// request snapshot sent for recalculation and the authoritative answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub revision: u64,
    pub draft: PayrollDraft,
    pub computed: PayrollComputed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Applied,
    /// The draft was edited after the request left, the answer was dropped
    Stale { current: u64 },
}

/// In-progress payroll for one employee and period.
///
/// Each successful edit bumps `revision` and recomputes the preview locally.
/// Authoritative results only land if they were computed for the current
/// revision, so a slow response can never overwrite newer edits.
#[derive(Debug, Clone)]
pub struct DraftSession {
    draft: PayrollDraft,
    computed: PayrollComputed,
    revision: u64,
    constants: TaxConstants,
}

impl DraftSession {
    pub fn new(draft: PayrollDraft, constants: TaxConstants) -> Result<Self, PayrollError> {
        let computed = compose_net_pay(&draft, &constants)?;

        Ok(Self {
            draft,
            computed,
            revision: 0,
            constants,
        })
    }

    pub fn draft(&self) -> &PayrollDraft {
        &self.draft
    }

    pub fn computed(&self) -> &PayrollComputed {
        &self.computed
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies `edit` to a copy of the draft and keeps it only if the result
    /// still computes. On error the session is untouched.
    pub fn edit<F>(&mut self, edit: F) -> Result<&PayrollComputed, PayrollError>
    where
        F: FnOnce(&mut PayrollDraft),
    {
        let mut draft = self.draft.clone();
        edit(&mut draft);

        self.commit(draft)
    }

    /// Edits a deduction percentage, deriving its amount in the same revision
    pub fn set_percent(&mut self, kind: DeductionKind, percent: Decimal) -> Result<&PayrollComputed, PayrollError> {
        let mut draft = self.draft.clone();
        draft.apply_percent(kind, percent, &self.constants)?;

        self.commit(draft)
    }

    pub fn recalculation(&self) -> Calculation {
        Calculation {
            revision: self.revision,
            draft: self.draft.clone(),
            computed: self.computed.clone(),
        }
    }

    pub fn apply_authoritative(&mut self, calculation: Calculation) -> Reconciliation {
        if calculation.revision != self.revision {
            debug!(
                response = calculation.revision,
                current = self.revision,
                "dropping stale payroll calculation"
            );

            return Reconciliation::Stale { current: self.revision };
        }

        self.draft = calculation.draft;
        self.computed = calculation.computed;

        Reconciliation::Applied
    }

    fn commit(&mut self, draft: PayrollDraft) -> Result<&PayrollComputed, PayrollError> {
        let computed = compose_net_pay(&draft, &self.constants)?;

        self.draft = draft;
        self.computed = computed;
        self.revision += 1;

        Ok(&self.computed)
    }
}
