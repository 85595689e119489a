mod anthropic_tests;
