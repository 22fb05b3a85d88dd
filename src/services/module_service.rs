use std::collections::BTreeMap;

use sea_orm::*;

use crate::models::module;

pub struct ModuleService;

impl ModuleService {
    /// Crée un module. Retourne None si le code existe déjà.
    pub async fn create(
        db: &DatabaseConnection,
        code: &str,
        name: &str,
        credit: i32,
    ) -> Result<Option<module::Model>, DbErr> {
        if Self::find_by_code(db, code).await?.is_some() {
            return Ok(None);
        }

        let created = module::ActiveModel {
            mod_code: Set(code.to_string()),
            mod_name: Set(name.to_string()),
            credit: Set(credit),
        }
        .insert(db)
        .await?;

        tracing::info!(mod_code = code, "Module created successfully");
        Ok(Some(created))
    }

    pub async fn find_by_code(
        db: &DatabaseConnection,
        code: &str,
    ) -> Result<Option<module::Model>, DbErr> {
        module::Entity::find_by_id(code.to_string()).one(db).await
    }

    /// Tous les modules, triés par code
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<module::Model>, DbErr> {
        module::Entity::find()
            .order_by_asc(module::Column::ModCode)
            .all(db)
            .await
    }

    /// Modules demandés, indexés par code. Les codes inconnus sont absents.
    pub async fn find_by_codes(
        db: &DatabaseConnection,
        codes: &[String],
    ) -> Result<BTreeMap<String, module::Model>, DbErr> {
        if codes.is_empty() {
            return Ok(BTreeMap::new());
        }

        let modules = module::Entity::find()
            .filter(module::Column::ModCode.is_in(codes.iter().cloned()))
            .all(db)
            .await?;

        Ok(modules
            .into_iter()
            .map(|m| (m.mod_code.clone(), m))
            .collect())
    }

    /// Met à jour les crédits. Retourne None si le module n'existe pas.
    pub async fn update_credit(
        db: &DatabaseConnection,
        code: &str,
        credit: i32,
    ) -> Result<Option<module::Model>, DbErr> {
        let existing = match Self::find_by_code(db, code).await? {
            Some(m) => m,
            None => return Ok(None),
        };

        let mut active_model: module::ActiveModel = existing.into();
        active_model.credit = Set(credit);
        let updated = active_model.update(db).await?;

        tracing::info!(mod_code = code, credit, "Module updated successfully");
        Ok(Some(updated))
    }

    /// Supprime un module. Retourne false s'il n'existait pas.
    pub async fn delete(db: &DatabaseConnection, code: &str) -> Result<bool, DbErr> {
        let result = module::Entity::delete_by_id(code.to_string()).exec(db).await?;

        if result.rows_affected > 0 {
            tracing::info!(mod_code = code, "Module deleted successfully");
        }
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_db;

    #[tokio::test]
    async fn test_module_lifecycle() {
        let db = memory_db().await;

        let created = ModuleService::create(&db, "CS101", "Intro to Clinics", 4).await.unwrap();
        assert_eq!(created.unwrap().credit, 4);

        // doublon
        assert!(ModuleService::create(&db, "CS101", "Other", 2).await.unwrap().is_none());

        let updated = ModuleService::update_credit(&db, "CS101", 6).await.unwrap().unwrap();
        assert_eq!(updated.credit, 6);
        assert_eq!(updated.mod_name, "Intro to Clinics");

        assert!(ModuleService::delete(&db, "CS101").await.unwrap());
        assert!(ModuleService::find_by_code(&db, "CS101").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_and_bulk() {
        let db = memory_db().await;
        ModuleService::create(&db, "HS201", "Triage", 3).await.unwrap();
        ModuleService::create(&db, "HS101", "Patient Care", 4).await.unwrap();
        ModuleService::create(&db, "HS301", "Pharmacology", 2).await.unwrap();

        let codes: Vec<String> = ModuleService::find_all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.mod_code)
            .collect();
        assert_eq!(codes, vec!["HS101", "HS201", "HS301"]);

        let wanted = vec!["HS301".to_string(), "HS101".to_string(), "NOPE".to_string()];
        let found = ModuleService::find_by_codes(&db, &wanted).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found["HS101"].mod_name, "Patient Care");
        assert_eq!(found["HS301"].credit, 2);
        assert!(!found.contains_key("NOPE"));

        assert!(ModuleService::find_by_codes(&db, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_module() {
        let db = memory_db().await;

        assert!(ModuleService::find_by_code(&db, "NOPE").await.unwrap().is_none());
        assert!(ModuleService::update_credit(&db, "NOPE", 3).await.unwrap().is_none());
        assert!(!ModuleService::delete(&db, "NOPE").await.unwrap());
    }
}
