//! Populate the database with a demo account and sample recipes.
//!
//! Usage: `cargo run --bin seed` (reads the same environment as the server).

use anyhow::Context;
use tracing::info;

use uc_cookbook::auth::password::hash_password;
use uc_cookbook::auth::repo::User;
use uc_cookbook::cookbook::repo::CookbookSave;
use uc_cookbook::recipes::repo::{Difficulty, Recipe};
use uc_cookbook::state::AppState;

struct SeedRecipe {
    title: &'static str,
    description: &'static str,
    ingredients: &'static [&'static str],
    steps: &'static [&'static str],
    tags: &'static [&'static str],
    time_minutes: i32,
    difficulty: Difficulty,
    image_url: Option<&'static str>,
}

const RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        title: "Classic Mac and Cheese",
        description: "Creamy, cheesy comfort food perfect for college students. \
                      Quick to make and satisfying!",
        ingredients: &[
            "1 lb elbow macaroni",
            "4 cups shredded cheddar cheese",
            "3 cups milk",
            "1/4 cup butter",
            "1/4 cup flour",
            "Salt and pepper to taste",
        ],
        steps: &[
            "Cook macaroni according to package directions",
            "In a saucepan, melt butter and whisk in flour",
            "Gradually add milk, stirring constantly",
            "Add cheese and stir until melted",
            "Combine sauce with cooked pasta",
            "Season with salt and pepper",
        ],
        tags: &["pasta", "comfort-food", "easy", "vegetarian"],
        time_minutes: 25,
        difficulty: Difficulty::Easy,
        image_url: Some("https://images.unsplash.com/photo-1543339308-43e59d6b73a6"),
    },
    SeedRecipe {
        title: "UC Bearcat Burrito Bowl",
        description: "Build your own burrito bowl inspired by campus favorites. \
                      Customizable and nutritious!",
        ingredients: &[
            "2 cups cooked rice",
            "1 can black beans",
            "1 lb chicken breast",
            "1 cup corn",
            "Salsa, cheese, sour cream",
            "Taco seasoning",
        ],
        steps: &[
            "Season and grill the chicken, then slice",
            "Warm the beans and corn",
            "Layer rice, beans, corn and chicken in a bowl",
            "Top with salsa, cheese and sour cream",
        ],
        tags: &["mexican", "bowl", "protein"],
        time_minutes: 35,
        difficulty: Difficulty::Medium,
        image_url: None,
    },
    SeedRecipe {
        title: "Weekend Beef Wellington",
        description: "A project recipe for when you want to impress. Plan ahead \
                      and take your time.",
        ingredients: &[
            "2 lb beef tenderloin",
            "1 lb puff pastry",
            "8 oz mushrooms",
            "4 slices prosciutto",
            "2 egg yolks",
            "Dijon mustard",
        ],
        steps: &[
            "Sear the tenderloin on all sides",
            "Blend and cook down the mushrooms into a duxelles",
            "Wrap the beef in prosciutto and duxelles",
            "Encase in puff pastry and brush with egg",
            "Bake until the pastry is golden and the center is medium-rare",
            "Rest before slicing",
        ],
        tags: &["beef", "advanced", "dinner-party"],
        time_minutes: 150,
        difficulty: Difficulty::Hard,
        image_url: None,
    },
];

async fn seed_user(state: &AppState, email: &str, username: &str, password: &str) -> anyhow::Result<User> {
    if let Some(existing) = User::find_by_email(&state.db, email).await? {
        info!(email, "user already present, skipping");
        return Ok(existing);
    }
    let hash = hash_password(password)?;
    let user = User::create(&state.db, email, username, &hash).await?;
    info!(email, user_id = user.id, "created user");
    Ok(user)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "uc_cookbook=info,seed=info".into()),
        )
        .init();

    let state = AppState::init().await.context("init app state")?;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .context("run migrations")?;

    info!("seeding database");

    let demo = seed_user(&state, "demo@mail.uc.edu", "demo_user", "demo123").await?;
    let chef = seed_user(&state, "john@mail.uc.edu", "john_chef", "password123").await?;

    let mut first_recipe_id = None;
    for (i, seed) in RECIPES.iter().enumerate() {
        let author = if i % 2 == 0 { &demo } else { &chef };
        let ingredients: Vec<String> = seed.ingredients.iter().map(|s| s.to_string()).collect();
        let steps: Vec<String> = seed.steps.iter().map(|s| s.to_string()).collect();
        let tags: Vec<String> = seed.tags.iter().map(|s| s.to_string()).collect();

        let recipe = Recipe::insert(
            &state.db,
            seed.title,
            seed.description,
            &ingredients,
            &steps,
            &tags,
            seed.time_minutes,
            seed.difficulty,
            seed.image_url,
            author.id,
        )
        .await
        .with_context(|| format!("insert recipe {}", seed.title))?;
        info!(recipe_id = recipe.id, title = seed.title, "created recipe");
        first_recipe_id.get_or_insert(recipe.id);
    }

    // Give john_chef one saved recipe so the cookbook page has content.
    if let Some(recipe_id) = first_recipe_id {
        if !CookbookSave::exists(&state.db, chef.id, recipe_id).await? {
            CookbookSave::insert(&state.db, chef.id, recipe_id).await?;
            info!(user_id = chef.id, recipe_id, "created cookbook save");
        }
    }

    info!("seeding complete");
    Ok(())
}
