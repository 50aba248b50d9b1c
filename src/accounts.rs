//! Accounts and membership.
//!
//! Demo-grade account management: registered users live in durable key-value
//! storage next to the current session user, and passwords are stored in
//! plaintext. There is no real security model anywhere in this system.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    email::{EmailMessage, Mailer},
    storage::{CURRENT_USER_KEY, KeyValueStore, REGISTERED_USERS_KEY},
};

/// Membership ladder, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipLevel {
    /// Entry tier; new registrations start here.
    Bronze,

    /// Second tier.
    Silver,

    /// Third tier.
    Gold,

    /// Top tier.
    Vip,
}

impl MembershipLevel {
    /// The next tier up, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Bronze => Some(Self::Silver),
            Self::Silver => Some(Self::Gold),
            Self::Gold => Some(Self::Vip),
            Self::Vip => None,
        }
    }

    /// Points needed to reach the next tier.
    #[must_use]
    pub fn points_to_next(self) -> Option<u32> {
        match self {
            Self::Bronze => Some(500),
            Self::Silver => Some(1000),
            Self::Gold => Some(2000),
            Self::Vip => None,
        }
    }

    /// Progress toward the next tier in `0.0..=1.0`; vip is always complete.
    #[must_use]
    pub fn progress(self, points: u32) -> f64 {
        match self.points_to_next() {
            Some(threshold) => (f64::from(points) / f64::from(threshold)).min(1.0),
            None => 1.0,
        }
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer.
    User,

    /// Staff account.
    Admin,
}

/// A signed-in user as exposed to the rest of the app. Never carries the
/// password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Email address; unique among registered users.
    pub email: String,

    /// Avatar image URL.
    pub avatar_url: String,

    /// Account role.
    pub role: Role,

    /// Current membership tier.
    pub membership_level: MembershipLevel,

    /// Loyalty points accrued.
    pub points: u32,
}

/// A registered account: the user profile plus the demo plaintext password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    /// The profile fields, flattened into the stored record.
    #[serde(flatten)]
    pub user: User,

    /// Plaintext password (demo only).
    pub password: String,
}

/// Account operation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Email/password pair matched no registered user.
    #[error("incorrect email or password")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("this email is already in use")]
    EmailTaken,
}

/// Registration and login over durable storage, with welcome emails.
pub struct AccountsService {
    storage: Arc<dyn KeyValueStore>,
    mailer: Arc<dyn Mailer>,
    delay: Duration,
    seed: Vec<RegisteredUser>,
}

impl fmt::Debug for AccountsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountsService")
            .field("delay", &self.delay)
            .field("seed", &self.seed.len())
            .finish_non_exhaustive()
    }
}

impl AccountsService {
    /// Service with the default one-second simulated network delay. `seed`
    /// is the demo account list written to storage on first use.
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        mailer: Arc<dyn Mailer>,
        seed: Vec<RegisteredUser>,
    ) -> Self {
        Self::with_delay(storage, mailer, seed, Duration::from_secs(1))
    }

    /// Service with a custom simulated delay.
    pub fn with_delay(
        storage: Arc<dyn KeyValueStore>,
        mailer: Arc<dyn Mailer>,
        seed: Vec<RegisteredUser>,
        delay: Duration,
    ) -> Self {
        Self {
            storage,
            mailer,
            delay,
            seed,
        }
    }

    /// Registered users from storage, seeding the demo accounts on first
    /// read or when the stored payload is unreadable.
    pub fn registered_users(&self) -> Vec<RegisteredUser> {
        match self.storage.get(REGISTERED_USERS_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(users) => users,
                Err(error) => {
                    tracing::warn!(%error, "discarding unreadable registered-user list");
                    self.initialize_users()
                }
            },
            None => self.initialize_users(),
        }
    }

    fn initialize_users(&self) -> Vec<RegisteredUser> {
        self.save_registered_users(&self.seed);
        self.seed.clone()
    }

    fn save_registered_users(&self, users: &[RegisteredUser]) {
        match serde_json::to_string(users) {
            Ok(raw) => self.storage.set(REGISTERED_USERS_KEY, &raw),
            Err(error) => tracing::warn!(%error, "failed to serialize registered users"),
        }
    }

    /// Currently signed-in user, if a readable record is stored.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.storage.get(CURRENT_USER_KEY)?;

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                tracing::warn!(%error, "discarding unreadable current user");
                None
            }
        }
    }

    fn save_current_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => self.storage.set(CURRENT_USER_KEY, &raw),
            Err(error) => tracing::warn!(%error, "failed to serialize current user"),
        }
    }

    /// Sign in with an email/password pair.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] when no registered user matches.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        tokio::time::sleep(self.delay).await;

        let found = self
            .registered_users()
            .into_iter()
            .find(|account| account.user.email == email && account.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        self.save_current_user(&found.user);

        Ok(found.user)
    }

    /// Create an account and sign it in. New members start at bronze with
    /// 100 points. The welcome email is best-effort: a failure is logged and
    /// never rolls back the registration.
    ///
    /// # Errors
    ///
    /// [`AuthError::EmailTaken`] when the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        tokio::time::sleep(self.delay).await;

        let mut users = self.registered_users();

        if users.iter().any(|account| account.user.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            avatar_url: format!(
                "https://source.unsplash.com/collection/4389215/150x150?sig={}",
                Uuid::new_v4()
            ),
            role: Role::User,
            membership_level: MembershipLevel::Bronze,
            points: 100,
        };

        users.push(RegisteredUser {
            user: user.clone(),
            password: password.to_string(),
        });

        self.save_registered_users(&users);
        self.save_current_user(&user);

        let welcome = EmailMessage {
            to: user.email.clone(),
            subject: "Welcome to the cinema".to_string(),
            template: "welcome".to_string(),
            data: json!({ "name": user.name }),
        };

        if let Err(error) = self.mailer.send(welcome).await {
            tracing::warn!(%error, "welcome email failed");
        }

        Ok(user)
    }

    /// Sign out, clearing the persisted session user.
    pub fn logout(&self) {
        self.storage.remove(CURRENT_USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        email::{MailerError, MockMailer},
        storage::MemoryStore,
    };

    use super::*;

    fn demo_account(email: &str) -> RegisteredUser {
        RegisteredUser {
            user: User {
                id: "1".to_string(),
                name: "João Silva".to_string(),
                email: email.to_string(),
                avatar_url: String::new(),
                role: Role::User,
                membership_level: MembershipLevel::Gold,
                points: 850,
            },
            password: "senha123".to_string(),
        }
    }

    fn service(mailer: MockMailer) -> AccountsService {
        AccountsService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(mailer),
            vec![demo_account("joao@exemplo.com")],
        )
    }

    fn ok_mailer() -> MockMailer {
        let mut mailer = MockMailer::new();
        mailer.expect_send().returning(|_| Ok(()));
        mailer
    }

    #[test]
    fn tier_progress_uses_the_next_threshold() {
        assert_eq!(MembershipLevel::Bronze.points_to_next(), Some(500));
        assert!((MembershipLevel::Bronze.progress(250) - 0.5).abs() < f64::EPSILON);
        assert!((MembershipLevel::Gold.progress(850) - 0.425).abs() < f64::EPSILON);
        // Overshooting the threshold clamps to complete.
        assert!((MembershipLevel::Bronze.progress(9999) - 1.0).abs() < f64::EPSILON);
        assert!((MembershipLevel::Vip.progress(0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ladder_tops_out_at_vip() {
        assert_eq!(MembershipLevel::Bronze.next(), Some(MembershipLevel::Silver));
        assert_eq!(MembershipLevel::Gold.next(), Some(MembershipLevel::Vip));
        assert_eq!(MembershipLevel::Vip.next(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn login_persists_the_session_user() -> TestResult {
        let accounts = service(MockMailer::new());

        let user = accounts.login("joao@exemplo.com", "senha123").await?;

        assert_eq!(user.name, "João Silva");
        assert_eq!(accounts.current_user(), Some(user));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn login_rejects_a_wrong_password() {
        let accounts = service(MockMailer::new());

        let result = accounts.login("joao@exemplo.com", "errada").await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
        assert_eq!(accounts.current_user(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn register_creates_a_bronze_account_with_starter_points() -> TestResult {
        let accounts = service(ok_mailer());

        let user = accounts
            .register("Maria Souza", "maria@exemplo.com", "senha123")
            .await?;

        assert_eq!(user.membership_level, MembershipLevel::Bronze);
        assert_eq!(user.points, 100);
        assert_eq!(accounts.current_user(), Some(user));
        assert_eq!(accounts.registered_users().len(), 2);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn register_rejects_a_taken_email() {
        let accounts = service(MockMailer::new());

        let result = accounts
            .register("Impostor", "joao@exemplo.com", "outra")
            .await;

        assert_eq!(result, Err(AuthError::EmailTaken));
        assert_eq!(accounts.registered_users().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn welcome_email_failure_does_not_roll_back_registration() -> TestResult {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .returning(|_| Err(MailerError::Delivery("provider down".to_string())));
        let accounts = service(mailer);

        let user = accounts
            .register("Maria Souza", "maria@exemplo.com", "senha123")
            .await?;

        assert_eq!(accounts.current_user(), Some(user));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn logout_clears_the_session() -> TestResult {
        let accounts = service(MockMailer::new());

        accounts.login("joao@exemplo.com", "senha123").await?;
        accounts.logout();

        assert_eq!(accounts.current_user(), None);

        Ok(())
    }

    #[test]
    fn corrupt_user_list_reseeds_the_demo_accounts() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(REGISTERED_USERS_KEY, "{broken");

        let accounts = AccountsService::new(
            Arc::clone(&storage) as Arc<dyn KeyValueStore>,
            Arc::new(MockMailer::new()),
            vec![demo_account("joao@exemplo.com")],
        );

        let users = accounts.registered_users();

        assert_eq!(users.len(), 1);
        // The seed was written back over the corrupt payload.
        assert!(
            storage
                .get(REGISTERED_USERS_KEY)
                .is_some_and(|raw| raw.starts_with('['))
        );
    }
}
