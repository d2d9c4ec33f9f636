use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum Player {
    Table,
    Id,
    Licence,
    FirstName,
    LastName,
    Points,
    ExactPoints,
    Category,
    Notes,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Admin {
    Table,
    Id,
    Email,
    Name,
}

#[derive(DeriveIden)]
pub(crate) enum ContactMessage {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Subject,
    Message,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Account {
    Table,
    Id,
    Email,
    HashedPassword,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Session {
    Table,
    Token,
    AccountId,
    ExpiresAt,
}
