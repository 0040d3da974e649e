//! Default demo data for an empty document

use rand::Rng;

use crate::auth::{hash_password_bcrypt, legacy_hash};
use crate::types::{Document, NewShopItem, ShopItem, StudentId, User, ADMIN_USERNAME};

/// Parameters for seeding an empty document
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Number of `userN` accounts to create
    pub user_count: usize,
    /// Starting balance, also stored in `settings.initialBalance`
    pub initial_balance: i64,
    pub admin_password: String,
    /// Store the admin digest as bcrypt instead of the legacy hash
    pub bcrypt_admin: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            user_count: 60,
            initial_balance: 100,
            admin_password: "admin123".to_string(),
            bcrypt_admin: false,
        }
    }
}

/// Student card number: two capital letters and six digits
pub fn generate_student_number<R: Rng>(rng: &mut R) -> String {
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let first = LETTERS[rng.gen_range(0..LETTERS.len())] as char;
    let second = LETTERS[rng.gen_range(0..LETTERS.len())] as char;
    let digits: u32 = rng.gen_range(100_000..1_000_000);
    format!("{}{}{}", first, second, digits)
}

fn demo_user<R: Rng>(i: usize, balance: i64, rng: &mut R) -> User {
    let student_id = StudentId {
        surname: format!("Прізвище{}", i),
        name: format!("Ім'я{}", i),
        dob: format!("{}-{:02}-{:02}", 2000 + i % 15, i % 12 + 1, i % 28 + 1),
        number: generate_student_number(rng),
        room: format!("{}", 100 + i),
    };
    User::participant(
        legacy_hash(&format!("pass{}", i)),
        balance,
        format!("./foto{}.png", i % 20 + 1),
        student_id,
    )
}

fn demo_shop_items() -> Vec<ShopItem> {
    let item = |id: i64, name: &str, price: f64, discount: Option<f64>, quantity: i64, category: &str, description: &str, image: &str, popularity: f64| {
        NewShopItem {
            id,
            name: name.to_string(),
            price,
            discount_price: discount,
            quantity,
            category: category.to_string(),
            description: description.to_string(),
            image: image.to_string(),
            popularity,
        }
        .into_record()
    };

    vec![
        item(1672522500001, "Кава 'Енергія СЕО'", 50.0, Some(45.0), 100, "drinks", "Найкраща кава для продуктивного дня.", "./t1.png", 10.0),
        item(1672522500002, "Снек 'Кодерський перекус'", 35.0, None, 200, "food", "Корисний та смачний.", "./t2.png", 5.0),
        item(1672522500003, "Футболка 'Я - СЕО'", 350.0, Some(300.0), 50, "clothing", "Покажи, хто тут головний.", "./t3.png", 20.0),
    ]
}

fn admin_digest(config: &SeedConfig) -> String {
    if config.bcrypt_admin {
        match hash_password_bcrypt(&config.admin_password) {
            Ok(digest) => return digest,
            Err(e) => tracing::warn!(error = %e, "bcrypt failed, storing legacy admin digest"),
        }
    }
    legacy_hash(&config.admin_password)
}

/// Fill in whatever defaults are missing
///
/// The admin account is created when absent. Demo users are only created
/// when the admin is the sole account, and demo items only when the catalog
/// is empty, so seeding an already populated document changes nothing.
pub fn seed_defaults(document: &mut Document, config: &SeedConfig) {
    if !document.users.contains_key(ADMIN_USERNAME) {
        document
            .users
            .insert(ADMIN_USERNAME.to_string(), User::admin(admin_digest(config)));
    }

    if document.users.len() <= 1 {
        document.settings.initial_balance = config.initial_balance;
        let mut rng = rand::thread_rng();
        for i in 1..=config.user_count {
            let username = format!("user{}", i);
            if !document.users.contains_key(&username) {
                let user = demo_user(i, config.initial_balance, &mut rng);
                document.users.insert(username, user);
            }
        }
        tracing::info!(users = document.users.len() - 1, "Seeded demo users");
    }

    if document.shop_items.is_empty() {
        document.shop_items = demo_shop_items();
        tracing::info!(items = document.shop_items.len(), "Seeded shop items");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_seed_empty_document() {
        let mut document = Document::new();
        seed_defaults(&mut document, &SeedConfig::default());

        assert_eq!(document.users.len(), 61);
        assert_eq!(document.shop_items.len(), 3);
        assert!(document.users["admin"].is_admin());

        let user7 = &document.users["user7"];
        assert_eq!(user7.get("balance"), Some(&json!(100)));
        assert_eq!(user7.get("photo"), Some(&json!("./foto8.png")));
        assert_eq!(user7.get("team"), Some(&Value::Null));
        let card: StudentId = serde_json::from_value(user7.get("studentID").unwrap().clone()).unwrap();
        assert_eq!(card.surname, "Прізвище7");
        assert_eq!(card.name, "Ім'я7");
        assert_eq!(card.dob, "2007-08-08");
        assert_eq!(card.room, "107");

        assert_eq!(document.shop_items[0]["name"], json!("Кава 'Енергія СЕО'"));
        assert_eq!(document.shop_items[1]["discountPrice"], Value::Null);
    }

    #[test]
    fn test_seed_is_noop_on_populated_document() {
        let mut document = Document::new();
        seed_defaults(&mut document, &SeedConfig::default());
        let before = document.clone();

        seed_defaults(&mut document, &SeedConfig::default());
        assert_eq!(document, before);
    }

    #[test]
    fn test_seed_uses_initial_balance() {
        let mut document = Document::new();
        let config = SeedConfig {
            user_count: 2,
            initial_balance: 250,
            ..Default::default()
        };
        seed_defaults(&mut document, &config);

        assert_eq!(document.settings.initial_balance, 250);
        assert_eq!(document.users["user2"].get("balance"), Some(&json!(250)));
    }

    #[test]
    fn test_bcrypt_admin_digest() {
        let mut document = Document::new();
        let config = SeedConfig {
            user_count: 0,
            bcrypt_admin: true,
            ..Default::default()
        };
        seed_defaults(&mut document, &config);

        let digest = document.users["admin"].password_hash().unwrap();
        assert!(digest.starts_with("$2"));
        assert!(crate::auth::verify_password("admin123", digest));
    }

    #[test]
    fn test_student_number_shape() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let number = generate_student_number(&mut rng);
            assert_eq!(number.len(), 8);
            assert!(number[..2].chars().all(|c| c.is_ascii_uppercase()));
            assert!(number[2..].chars().all(|c| c.is_ascii_digit()));
        }
    }
}
