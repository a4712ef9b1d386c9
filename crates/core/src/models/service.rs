use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::Professional;

/// A bookable service, owned either by an independent professional or by a
/// locale whose staff all offer it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub professional_id: Option<Uuid>,
    pub locale_id: Option<Uuid>,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
}

impl Service {
    pub fn is_offered_by(&self, professional: &Professional) -> bool {
        if self.professional_id == Some(professional.id) {
            return true;
        }
        matches!(
            (self.locale_id, professional.locale_id),
            (Some(service_locale), Some(staff_locale)) if service_locale == staff_locale
        )
    }
}
