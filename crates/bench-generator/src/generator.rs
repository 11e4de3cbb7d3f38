//! Record generation.

use crate::rules::UserRules;
use bench_core::{Address, User};
use fake::faker::address::en::{
    BuildingNumber, CityName, CountryName, SecondaryAddress, StreetName, ZipCode,
};
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Number of users in the pregenerated pool.
pub const POOL_SIZE: usize = 10_000;

/// Generate one address.
pub fn generate_address<R: Rng>(rng: &mut R, rules: &UserRules) -> Address {
    let building: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);

    let line2 = if rng.gen_ratio(1, rules.line2_null_one_in) {
        None
    } else {
        Some(SecondaryAddress().fake_with_rng(rng))
    };

    Address {
        line1: format!("{building} {street}"),
        line2,
        city: CityName().fake_with_rng(rng),
        country: CountryName().fake_with_rng(rng),
        zip: ZipCode().fake_with_rng(rng),
    }
}

/// Generate one user. The identifier is always left empty.
pub fn generate_user<R: Rng>(rng: &mut R, rules: &UserRules) -> User {
    let friend_count = rng.gen_range(rules.min_friends..=rules.max_friends);
    let friends = (0..friend_count)
        .map(|_| Username().fake_with_rng::<String, _>(rng))
        .collect();
    let (min_words, max_words) = rules.message_words;

    User {
        name: Name().fake_with_rng(rng),
        id: None,
        email: SafeEmail().fake_with_rng(rng),
        address: generate_address(rng, rules),
        friends,
        last_message: Sentence(min_words..max_words).fake_with_rng(rng),
    }
}

/// Generate `count` users with the default rules.
pub fn generate_users<R: Rng>(rng: &mut R, count: usize) -> Vec<User> {
    let rules = UserRules::default();
    (0..count).map(|_| generate_user(rng, &rules)).collect()
}

/// Generate the benchmark pool of [`POOL_SIZE`] users.
pub fn generate_pool<R: Rng>(rng: &mut R) -> Vec<User> {
    debug!("Generating pool of {} users", POOL_SIZE);
    generate_users(rng, POOL_SIZE)
}

/// Stateful generator owning its RNG and rules.
pub struct UserGenerator<R: Rng> {
    rng: R,
    rules: UserRules,
    generated: u64,
}

impl UserGenerator<StdRng> {
    /// Create a generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> UserGenerator<R> {
    /// Create a generator over the given RNG with default rules.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            rules: UserRules::default(),
            generated: 0,
        }
    }

    /// Replace the field rules.
    pub fn with_rules(mut self, rules: UserRules) -> Self {
        self.rules = rules;
        self
    }

    /// Get the field rules.
    pub fn rules(&self) -> &UserRules {
        &self.rules
    }

    /// Number of users produced so far.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Generate the next user.
    pub fn next_user(&mut self) -> User {
        self.generated += 1;
        generate_user(&mut self.rng, &self.rules)
    }

    /// Generate the next address.
    pub fn next_address(&mut self) -> Address {
        generate_address(&mut self.rng, &self.rules)
    }

    /// Lazily generate `count` users.
    pub fn users(&mut self, count: usize) -> UserIterator<'_, R> {
        UserIterator {
            generator: self,
            remaining: count,
        }
    }

    /// Generate the full benchmark pool.
    pub fn pool(&mut self) -> Vec<User> {
        self.users(POOL_SIZE).collect()
    }
}

/// Iterator that lazily generates users.
pub struct UserIterator<'a, R: Rng> {
    generator: &'a mut UserGenerator<R>,
    remaining: usize,
}

impl<R: Rng> Iterator for UserIterator<'_, R> {
    type Item = User;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.generator.next_user())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: Rng> ExactSizeIterator for UserIterator<'_, R> {}
