use anyhow::Context;
use bson::doc;
use chrono::Utc;
use dotenvy::dotenv;
use jokka::{
    config::Config,
    models::{
        event::{Event, EventStatus, TicketType},
        place::Place,
        user::{Role, User},
    },
    store::{collection, DocumentStore, MongoStore},
    telemetry,
    utils::auth::hash_password,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    telemetry::init();
    let config = Config::from_env()?;
    let store = MongoStore::connect(&config).await.context("failed to connect to MongoDB")?;

    seed_admin(&store, &config).await?;
    let places = seed_places(&store).await?;
    let events = seed_events(&store).await?;

    info!(places, events, "seeding complete");
    Ok(())
}

async fn seed_admin(store: &dyn DocumentStore, config: &Config) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        info!("ADMIN_EMAIL / ADMIN_PASSWORD not set, skipping admin account");
        return Ok(());
    };

    let users = collection::<User>(store);
    if users.find_one(doc! { "email": email.as_str() }).await?.is_some() {
        info!(email = %email, "admin account already exists, skipping");
        return Ok(());
    }

    let admin = User {
        id: None,
        name: "Administrator".to_string(),
        email: email.to_lowercase(),
        password_hash: hash_password(password).context("failed to hash admin password")?,
        role: Role::Admin,
        created_at: Utc::now(),
    };
    users.insert_one(&admin).await?;
    info!(email = %admin.email, "admin account created");
    Ok(())
}

async fn seed_places(store: &dyn DocumentStore) -> anyhow::Result<usize> {
    let places = collection::<Place>(store);
    if !places.find(doc! {}).await?.is_empty() {
        info!("places already present, skipping");
        return Ok(0);
    }

    let samples = [
        ("Candi Prambanan", "Temple", 4.8, "Klaten, Central Java", 50_000, true),
        ("Pantai Parangtritis", "Beach", 4.4, "Bantul, Yogyakarta", 10_000, true),
        ("Kawah Ijen", "Nature", 4.9, "Banyuwangi, East Java", 100_000, false),
    ];
    for (name, category, rating, location, price, is_featured) in samples {
        places
            .insert_one(&Place {
                id: None,
                name: name.to_string(),
                category: category.to_string(),
                rating,
                description: format!("Sample listing for {name}."),
                location: location.to_string(),
                price,
                image_url: String::new(),
                is_featured,
                created_at: Utc::now(),
            })
            .await?;
    }
    Ok(samples.len())
}

async fn seed_events(store: &dyn DocumentStore) -> anyhow::Result<usize> {
    let events = collection::<Event>(store);
    if !events.find(doc! {}).await?.is_empty() {
        info!("events already present, skipping");
        return Ok(0);
    }

    let start = Utc::now() + chrono::Duration::days(30);
    let samples = [
        ("Jakarta Music Fest", "Music", "Jakarta Convention Center", 150_000),
        ("Comedy Night", "Comedy", "Isola Bar, Jakarta", 75_000),
    ];
    for (title, category, location_name, price) in samples {
        events
            .insert_one(&Event {
                id: None,
                organizer_id: String::new(),
                title: title.to_string(),
                description: format!("{title}, a sample event."),
                category: category.to_string(),
                start_date: start.format("%Y-%m-%dT19:00").to_string(),
                end_date: start.format("%Y-%m-%dT23:00").to_string(),
                location_name: location_name.to_string(),
                latitude: None,
                longitude: None,
                poster_url: String::new(),
                ticket_types: vec![
                    TicketType { name: "Regular".to_string(), price, stock: 500, sold: 0 },
                    TicketType { name: "VIP".to_string(), price: price * 2, stock: 50, sold: 0 },
                ],
                status: EventStatus::Published,
                created_at: Utc::now(),
            })
            .await?;
    }
    Ok(samples.len())
}
