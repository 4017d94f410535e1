use kinopoisk_core::{FieldSelection, KinopoiskScraper, SearchOptions, SearchResults};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kinopoisk_core=debug")),
        )
        .init();

    let scraper = KinopoiskScraper::new()?;
    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Побег из Шоушенка".to_string());

    println!("🔍 Ищем '{}'...\n", query);

    let results = scraper.search(&query, &SearchOptions::default()).await?;
    let SearchResults::Entries(entries) = results else {
        return Ok(());
    };

    println!("Найдено {} результатов:", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        println!("  {}. {} - ID: {}", i + 1, entry.title, entry.id);
    }

    if let Some(first) = entries.first() {
        println!("\n🎬 Загружаем фильм: {} (ID: {})\n", first.title, first.id);

        let film = scraper.get_film(&first.id, &FieldSelection::all(), None).await?;

        println!("Название: {}", film.title.unwrap_or_default());
        if let Some(alt) = film.alternative_title.filter(|t| !t.is_empty()) {
            println!("Оригинальное название: {}", alt);
        }
        if let Some(year) = film.year.filter(|y| !y.is_nan()) {
            println!("Год: {}", year);
        }
        if let Some(rating) = film.rating.filter(|r| !r.is_nan()) {
            println!("Рейтинг: {:.3} ({} голосов)", rating, film.votes.unwrap_or(f64::NAN));
        }
        println!("Тип: {:?}", film.film_type);
        println!("Жанр: {}", film.genre.unwrap_or_default().join(", "));
        println!("Страна: {}", film.country.unwrap_or_default().join(", "));
        println!("Режиссер: {}", film.director.unwrap_or_default().join(", "));
        println!("В ролях: {}", film.actors.unwrap_or_default().join(", "));
        println!("Время: {}", film.time.unwrap_or_default());
    }

    Ok(())
}
