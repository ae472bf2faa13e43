use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxContentRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxContactMeRepo {
    pub pool: PgPool,
}
