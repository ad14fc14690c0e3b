//! CSV export of cached movie lists

use crate::catalog::Category;
use crate::record::MovieRecord;

/// Builds CSV text for a category's cached movies
///
/// Header is `Rank,Title,Year,IMDb Rating,Category`; titles are quoted with
/// embedded double quotes doubled per RFC 4180.
pub fn build_csv(category: Category, movies: &[MovieRecord]) -> String {
    let mut csv = String::from("Rank,Title,Year,IMDb Rating,Category\n");

    for movie in movies {
        let title = movie.title.replace('"', "\"\"");
        csv.push_str(&format!(
            "{},\"{}\",{},{},{}\n",
            movie.rank, title, movie.year, movie.rating, category
        ));
    }

    csv
}

/// Suggested download filename for a category export
pub fn export_filename(category: Category) -> String {
    format!("imdb_{}_movies.csv", category)
}
