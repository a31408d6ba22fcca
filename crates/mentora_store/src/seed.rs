//! Startup seeding of the service catalog.
//!
//! Services are immutable reference data declared in the configuration.
//! Seeding matches by title so restarts do not duplicate documents.

use crate::error::StoreError;
use crate::models::Service;
use crate::repositories::ServiceRepository;
use mentora_config::ServiceSeed;
use tracing::info;

/// Insert every configured service that is not present yet.
///
/// Returns the number of services inserted.
pub async fn seed_services(
    repo: &dyn ServiceRepository,
    seeds: &[ServiceSeed],
) -> Result<usize, StoreError> {
    let mut inserted = 0;
    for seed in seeds {
        if repo.find_by_title(&seed.title).await?.is_some() {
            continue;
        }
        let service = repo
            .insert(Service {
                id: None,
                title: seed.title.clone(),
                description: seed.description.clone(),
                duration_minutes: seed.duration_minutes,
                price: seed.price,
                mentor_email: seed.mentor_email.clone(),
            })
            .await?;
        info!(
            "Seeded service '{}' ({})",
            service.title,
            service.id.as_deref().unwrap_or("?")
        );
        inserted += 1;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryServiceRepository;

    fn seed(title: &str) -> ServiceSeed {
        ServiceSeed {
            title: title.to_string(),
            description: "desc".to_string(),
            duration_minutes: 45,
            price: 5000,
            mentor_email: "mentor@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let repo = MemoryServiceRepository::new();
        let seeds = vec![seed("Career mentoring"), seed("Code review")];

        assert_eq!(seed_services(&repo, &seeds).await.unwrap(), 2);
        // second run inserts nothing
        assert_eq!(seed_services(&repo, &seeds).await.unwrap(), 0);

        let found = repo.find_by_title("Code review").await.unwrap().unwrap();
        assert_eq!(found.duration_minutes, 45);
        assert_eq!(found.price, 5000);
    }
}
