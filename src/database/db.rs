use log::info;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};

use crate::comment::model::Comment;
use crate::user::model::User;

pub async fn connect_to_mongo(uri: &str, database_name: &str) -> mongodb::error::Result<Database> {
    let mut client_options = ClientOptions::parse(uri).await?;
    client_options.app_name = Some("blog-comments".to_string());

    let client = Client::with_options(client_options)?;

    // Ping the server to see if you can connect to the cluster
    client.database("admin").run_command(doc! { "ping": 1 }).await?;

    info!("Connected successfully to MongoDB");

    let db = client.database(database_name);
    ensure_indexes(&db).await?;
    Ok(db)
}

async fn ensure_indexes(db: &Database) -> mongodb::error::Result<()> {
    db.collection::<User>("users")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    db.collection::<Comment>("comments")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "post_id": 1, "created_at": -1 })
                .build(),
        )
        .await?;

    Ok(())
}
