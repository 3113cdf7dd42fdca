//! Bundled sample projects shown when the project list cannot be fetched.

use rae_core::entities::Project;
use rae_core::enums::ProjectStatus;

/// Five demonstration projects, newest first.
pub fn sample_projects() -> Vec<Project> {
    [
        (
            "1",
            "Rénovation Immeuble Haussmannien",
            "ABC Construction",
            "Diagnostic des matériaux réemployables dans un immeuble haussmannien du 9ème arrondissement avant rénovation complète.",
            ProjectStatus::InProgress,
            "12/05/2025",
        ),
        (
            "2",
            "Déconstruction Bâtiment Industriel",
            "Groupe Vinci",
            "Identification et valorisation des matériaux dans un ancien site industriel avant démolition complète.",
            ProjectStatus::Completed,
            "08/05/2025",
        ),
        (
            "3",
            "Réhabilitation École Jules Ferry",
            "Mairie de Paris",
            "Étude des possibilités de réemploi dans le cadre de la réhabilitation d'une école élémentaire.",
            ProjectStatus::Pending,
            "05/05/2025",
        ),
        (
            "4",
            "Extension Centre Commercial",
            "Carrefour Immobilier",
            "Analyse des matériaux récupérables dans l'ancien parking avant construction de l'extension.",
            ProjectStatus::InProgress,
            "02/05/2025",
        ),
        (
            "5",
            "Renouvellement Campus Universitaire",
            "Université Paris-Saclay",
            "Diagnostic complet des bâtiments du campus avant rénovation énergétique et architecturale.",
            ProjectStatus::Archived,
            "28/04/2025",
        ),
    ]
    .into_iter()
    .map(|(id, title, client, description, status, date)| Project {
        id: id.to_string(),
        title: title.to_string(),
        client: client.to_string(),
        description: description.to_string(),
        status,
        date: date.to_string(),
    })
    .collect()
}
