// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table avec SeaORM.
//
// Liste des modules:
//   - users : Utilisateurs (email unique, téléphone)
//   - identification : Pièces d'identité (clé de la vérification OTP)
//   - verification : Code OTP courant par identification (expire 5 min)
//   - role / user_role : Rôles et attribution aux utilisateurs
//   - physician / patient : Médecins et patients
//   - appointment : Rendez-vous patient ↔ médecin
//   - billing : Factures liées aux rendez-vous
//   - module : Catalogue de modules (code, nom, crédits)
//   - health : Health check API
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//
// Points d'attention:
//   - "User" est un mot réservé PostgreSQL : la table est toujours citée
//   - Les relations entre tables sont définies dans chaque modèle et
//     servent aussi à générer les clés étrangères (db::schema)
//
// ============================================================================

pub mod users;
pub mod identification;
pub mod verification;
pub mod role;
pub mod user_role;
pub mod physician;
pub mod patient;
pub mod appointment;
pub mod billing;
pub mod module;
pub mod health;
pub mod dto;
