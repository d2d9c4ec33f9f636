use crate::macros::*;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

use crate::enums::*;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Player::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Player::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Player::Licence)
                            .string()
                            .unique_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Player::FirstName).string().not_null())
                    .col(ColumnDef::new(Player::LastName).string().not_null())
                    .col(ColumnDef::new(Player::Points).integer().not_null())
                    .col(ColumnDef::new(Player::ExactPoints).double().not_null())
                    .col(ColumnDef::new(Player::Category).string())
                    .col(ColumnDef::new(Player::Notes).text())
                    .col(
                        ColumnDef::new(Player::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Admin::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admin::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Admin::Email).string().unique_key().not_null())
                    .col(ColumnDef::new(Admin::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContactMessage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContactMessage::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContactMessage::Name).string().not_null())
                    .col(ColumnDef::new(ContactMessage::Email).string().not_null())
                    .col(ColumnDef::new(ContactMessage::Phone).string())
                    .col(ColumnDef::new(ContactMessage::Subject).string().not_null())
                    .col(ColumnDef::new(ContactMessage::Message).text().not_null())
                    .col(
                        ColumnDef::new(ContactMessage::Status)
                            .string()
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(ContactMessage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table!(ContactMessage, manager);
        drop_table!(Admin, manager);
        drop_table!(Player, manager);
        Ok(())
    }
}
