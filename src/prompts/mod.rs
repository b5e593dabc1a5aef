pub mod repository_analysis_prompt;
