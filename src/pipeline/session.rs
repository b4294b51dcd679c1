use chrono::{DateTime, FixedOffset, Offset, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Explicit per-request context handed to every form: who is signed in and
/// the UTC offset their calendar dates and clock times are expressed in.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: Option<CurrentUser>,
    pub offset: FixedOffset,
}

impl Session {
    pub fn new(user: Option<CurrentUser>, offset: FixedOffset) -> Self {
        Self { user, offset }
    }

    pub fn signed_in(id: Uuid, email: Option<String>) -> Self {
        Self::new(Some(CurrentUser { id, email }), utc())
    }

    pub fn anonymous() -> Self {
        Self::new(None, utc())
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|u| u.id)
    }

    /// Wall-clock time in the session's offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_session_has_no_user() {
        assert_eq!(Session::anonymous().user_id(), None);
    }

    #[test]
    fn test_now_is_expressed_in_session_offset() {
        let offset = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let session = Session::signed_in(Uuid::new_v4(), None).with_offset(offset);
        assert_eq!(session.now().offset(), &offset);
    }
}
