use std::env;

pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub jwt_secret: String,
    pub jwt_expiry_secs: u64,
    pub bcrypt_cost: u32,
    pub seed_hostel: Option<SeedHostel>,
}

/// Hostel created at start-up when `SEED_HOSTEL_NAME` is set.
pub struct SeedHostel {
    pub name: String,
    pub location: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| "PORT must be a valid number".to_string())?;

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;
        if jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        let jwt_expiry_secs = env::var("JWT_EXPIRY_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_EXPIRY_SECS must be a number of seconds".to_string())?;

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(cost) => parse_bcrypt_cost(&cost)?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        let seed_hostel = env::var("SEED_HOSTEL_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .map(|name| SeedHostel {
                name,
                location: env::var("SEED_HOSTEL_LOCATION").unwrap_or_default(),
            });

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/hostel.db".to_string()),
            jwt_secret,
            jwt_expiry_secs,
            bcrypt_cost,
            seed_hostel,
        })
    }
}

// bcrypt only accepts costs 4..=31; anything else would fail on every hash
fn parse_bcrypt_cost(raw: &str) -> Result<u32, String> {
    let cost = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| "BCRYPT_COST must be a number".to_string())?;
    if !(4..=31).contains(&cost) {
        return Err(format!("BCRYPT_COST must be between 4 and 31, got {}", cost));
    }
    Ok(cost)
}
