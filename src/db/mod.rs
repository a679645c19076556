pub mod mock_db;
pub mod organization_repository;
pub mod postgres_organization_repository;
pub mod postgres_subscription_repository;
pub mod postgres_workspace_instance_repository;
pub mod subscription_repository;
pub mod workspace_instance_repository;
